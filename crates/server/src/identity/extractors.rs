use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::AppError;

use super::Session;

/// Message shown when an operation is attempted before sign-in completes.
pub const NOT_READY_MESSAGE: &str = "Database not ready or user not authenticated. Please wait.";

/// Extractor that requires a session. Returns 401 if no valid token.
pub struct SessionRequired(pub Session);

impl<S: Send + Sync> FromRequestParts<S> for SessionRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(SessionRequired)
            .ok_or_else(|| AppError::unauthorized(NOT_READY_MESSAGE))
    }
}
