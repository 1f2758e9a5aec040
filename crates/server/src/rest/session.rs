use axum::{extract::State, Json};

use shared_types::{AppError, SessionResponse, SignInRequest};
use crate::identity::extractors::SessionRequired;
use crate::identity::IdentityProvider;

/// POST /api/session
#[utoipa::path(
    post,
    path = "/api/session",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Session established", body = SessionResponse),
        (status = 500, description = "Token could not be issued", body = AppError)
    ),
    tag = "session"
)]
pub async fn sign_in(
    State(identity): State<IdentityProvider>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let issued = identity.sign_in(body.token.as_deref())?;
    Ok(Json(SessionResponse::from(issued)))
}

/// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Not signed in", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "session"
)]
pub async fn current_session(
    SessionRequired(session): SessionRequired,
) -> Json<SessionResponse> {
    Json(SessionResponse::from(session))
}
