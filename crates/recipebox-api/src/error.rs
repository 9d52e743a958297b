use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

use recipebox_db::WriteError;
use recipebox_types::api::ErrorResponse;
use recipebox_types::validation::ValidationErrors;

pub const VALIDATION_FAILED: &str = "Validation failed";

/// Every way a handler can fail. Rendered as `{"errors": [...]}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("User not found")]
    UserNotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UsernameTaken | ApiError::Validation(_) | ApiError::InvalidBody => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::NotLoggedIn
            | ApiError::UserNotFound
            | ApiError::Unauthorized
            | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation_failed() -> Self {
        ApiError::Validation(vec![VALIDATION_FAILED.to_string()])
    }

    /// Map a rejected write. Store detail goes to the log, never to the client.
    pub fn from_write(err: WriteError, on_conflict: ApiError) -> Self {
        match err {
            WriteError::Conflict(detail) => {
                debug!("Write conflict: {}", detail);
                on_conflict
            }
            WriteError::Invalid(detail) => {
                warn!("Write rejected by store: {}", detail);
                ApiError::validation_failed()
            }
            WriteError::Internal(err) => ApiError::Internal(err),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.into_messages())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!("spawn_blocking join error: {}", err);
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errors = match self {
            ApiError::Validation(messages) => messages,
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                vec!["Internal server error".to_string()]
            }
            other => vec![other.to_string()],
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

/// `Json<T>` whose rejection is an [`ApiError`] instead of axum's plain-text body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::InvalidBody)
            }
        }
    }
}
