use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::session::Session;

/// The user a guarded request runs as.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
}

/// Reject requests without a live session before the handler runs.
pub async fn require_session(
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let id = session.user_id.ok_or(ApiError::Unauthorized)?;
    req.extensions_mut().insert(CurrentUser { id });
    Ok(next.run(req).await)
}
