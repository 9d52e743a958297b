use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use recipebox_db::models::NewRecipe;
use recipebox_types::api::{CreateRecipeRequest, RecipeResponse};

use crate::error::{ApiError, JsonBody};
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::views::recipe_response;

/// Every recipe from every user. No paging.
pub async fn list_recipes(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_recipes()).await??;

    Ok(Json(rows.into_iter().map(recipe_response).collect()))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    JsonBody(req): JsonBody<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let db = state.clone();
    let recipe = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        // The session may outlive its user
        if db.db.get_user_by_id(user.id)?.is_none() {
            return Err(ApiError::Unauthorized);
        }

        db.db
            .create_recipe(
                user.id,
                &NewRecipe {
                    title: &req.title,
                    instructions: &req.instructions,
                    minutes_to_complete: req.minutes_to_complete,
                },
            )
            .map_err(|e| ApiError::from_write(e, ApiError::validation_failed()))
    })
    .await??;

    info!("User {} created recipe {}", user.id, recipe.id);
    Ok((StatusCode::CREATED, Json(recipe_response(recipe))))
}
