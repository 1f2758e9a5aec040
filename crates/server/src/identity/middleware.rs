use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use super::IdentityProvider;

/// Permissive session middleware.
///
/// Validates the `Authorization: Bearer` token (or an `access_token` query
/// parameter, for `EventSource` clients that cannot set headers) and
/// inserts the `Session` into request extensions. Does NOT reject unauthenticated
/// requests; handlers that need a session use `SessionRequired`.
pub async fn session_middleware(
    State(identity): State<IdentityProvider>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers()).or_else(|| query_token(req.uri().query()));
    if let Some(token) = token {
        match identity.validate_session(&token) {
            Ok(session) => {
                req.extensions_mut().insert(session);
            }
            Err(_) => {
                tracing::debug!("Ignoring invalid bearer token");
            }
        }
    }
    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn query_token(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("access_token="))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
