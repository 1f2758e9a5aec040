use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Extractor that resolves the deployment/application id scoping every
/// store operation.
///
/// Priority:
/// 1. `X-App-Id` header
/// 2. `?app=xxx` query param
/// 3. `[app].default_app_id` from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppId(pub String);

impl AppId {
    /// Sanitize an app id to lowercase alphanumeric + hyphens.
    pub fn sanitize(raw: &str) -> String {
        raw.trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect()
    }

    pub fn configured_default() -> Self {
        AppId(Self::sanitize(&crate::config::app_config().app.default_app_id))
    }

    fn resolve(parts: &Parts) -> Option<Self> {
        // 1. X-App-Id header
        if let Some(val) = parts.headers.get("x-app-id") {
            if let Ok(s) = val.to_str() {
                let sanitized = Self::sanitize(s);
                if !sanitized.is_empty() {
                    return Some(AppId(sanitized));
                }
            }
        }

        // 2. Query parameter ?app=xxx
        if let Some(query) = parts.uri.query() {
            for pair in query.split('&') {
                if let Some(val) = pair.strip_prefix("app=") {
                    let sanitized = Self::sanitize(val);
                    if !sanitized.is_empty() {
                        return Some(AppId(sanitized));
                    }
                }
            }
        }

        None
    }
}

impl<S> FromRequestParts<S> for AppId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::resolve(parts).unwrap_or_else(Self::configured_default))
    }
}
