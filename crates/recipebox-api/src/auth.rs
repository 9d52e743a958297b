use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use recipebox_db::models::NewUser;
use recipebox_types::api::{LoginRequest, SignupRequest, UserResponse};

use crate::error::{ApiError, JsonBody};
use crate::password;
use crate::session::{Session, removal_cookie, start_session};
use crate::state::AppState;
use crate::views::user_response;

pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    // Argon2 and the insert are both blocking work
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let password_hash = password::hash_password(&req.password)?;
        db.db
            .create_user(&NewUser {
                username: req.username(),
                password_hash: &password_hash,
                bio: req.bio.as_deref(),
                image_url: req.image_url.as_deref(),
            })
            .map_err(|e| ApiError::from_write(e, ApiError::UsernameTaken))
    })
    .await??;

    info!("User {} signed up as {}", user.id, user.username);
    let jar = start_session(&state, &session, jar, user.id);

    Ok((StatusCode::CREATED, jar, Json(user_response(user))))
}

pub async fn check_session(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = session.user_id.ok_or(ApiError::NotLoggedIn)?;

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_id(user_id)).await??;

    match user {
        Some(user) => Ok(Json(user_response(user))),
        None => {
            // Session points at a user that no longer exists
            if let Some(token) = session.token.as_deref() {
                state.sessions.destroy(token);
            }
            Err(ApiError::UserNotFound)
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let Some(user) = db.db.get_user_by_username(req.username())? else {
            // Same cost as a real check so timing doesn't reveal the miss
            let _ = password::verify_password(&req.password, &db.dummy_hash);
            return Ok(None);
        };
        Ok(password::verify_password(&req.password, &user.password_hash).then_some(user))
    })
    .await??;

    let Some(user) = user else {
        debug!("Rejected login attempt");
        return Err(ApiError::InvalidCredentials);
    };

    info!("User {} logged in", user.id);
    let jar = start_session(&state, &session, jar, user.id);

    Ok((jar, Json(user_response(user))))
}

pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(token), Some(user_id)) = (session.token, session.user_id) else {
        return Err(ApiError::NotLoggedIn);
    };

    state.sessions.destroy(&token);
    info!("User {} logged out", user_id);

    Ok((StatusCode::NO_CONTENT, jar.remove(removal_cookie())))
}
