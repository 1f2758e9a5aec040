pub mod extractors;
pub mod jwt;
pub mod middleware;

use chrono::Duration;
use shared_types::{AppError, SessionResponse};
use std::sync::Arc;

use jwt::{TOKEN_TYPE_BOOTSTRAP, TOKEN_TYPE_SESSION};

/// The authenticated party behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub actor_id: String,
    pub anonymous: bool,
}

/// A freshly established session and the bearer token that proves it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: Session,
    pub token: String,
    pub expires_in: i64,
}

impl From<IssuedSession> for SessionResponse {
    fn from(issued: IssuedSession) -> Self {
        SessionResponse {
            actor_id: issued.session.actor_id,
            anonymous: issued.session.anonymous,
            access_token: Some(issued.token),
            expires_in: Some(issued.expires_in),
        }
    }
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        SessionResponse {
            actor_id: session.actor_id,
            anonymous: session.anonymous,
            access_token: None,
            expires_in: None,
        }
    }
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct IdentityProvider {
    secret: Arc<[u8]>,
    session_ttl: Duration,
}

impl IdentityProvider {
    pub fn new(secret: impl AsRef<[u8]>, session_ttl: Duration) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            session_ttl,
        }
    }

    /// Build from `SESSION_SECRET`. Without it a random per-process secret is
    /// used, so sessions do not survive a restart.
    pub fn from_env(session_ttl_hours: i64) -> Self {
        let secret = crate::config::env_var("SESSION_SECRET").unwrap_or_else(|| {
            tracing::warn!("SESSION_SECRET not set, generating an ephemeral secret");
            format!("{}{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
        });
        Self::new(secret.as_bytes(), Duration::hours(session_ttl_hours.max(1)))
    }

    /// Establish a session.
    ///
    /// A valid bootstrap token signs the caller in as its subject. No token
    /// means an anonymous session with a fresh actor id. An invalid token is
    /// logged and also falls back to anonymous.
    pub fn sign_in(&self, bootstrap_token: Option<&str>) -> Result<IssuedSession, AppError> {
        let token = bootstrap_token.map(str::trim).filter(|t| !t.is_empty());
        let session = match token {
            Some(token) => match jwt::validate_token(&self.secret, token, TOKEN_TYPE_BOOTSTRAP) {
                Ok(claims) => Session {
                    actor_id: claims.sub,
                    anonymous: false,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Bootstrap token rejected, signing in anonymously");
                    Self::anonymous()
                }
            },
            None => Self::anonymous(),
        };

        let token = jwt::create_token(
            &self.secret,
            &session.actor_id,
            session.anonymous,
            TOKEN_TYPE_SESSION,
            self.session_ttl,
        )
        .map_err(|e| AppError::internal(format!("Failed to issue session token: {e}")))?;

        tracing::info!(actor_id = %session.actor_id, anonymous = session.anonymous, "Session established");
        Ok(IssuedSession {
            session,
            token,
            expires_in: self.session_ttl.num_seconds(),
        })
    }

    /// Verify a bearer token presented on a request.
    pub fn validate_session(&self, token: &str) -> Result<Session, AppError> {
        let claims = jwt::validate_token(&self.secret, token, TOKEN_TYPE_SESSION)
            .map_err(|_| AppError::unauthorized("Invalid or expired session"))?;
        Ok(Session {
            actor_id: claims.sub,
            anonymous: claims.anonymous,
        })
    }

    /// Mint a bootstrap token for `actor_id`, handed out of band to a client.
    pub fn issue_bootstrap(&self, actor_id: &str, ttl: Duration) -> Result<String, AppError> {
        let actor_id = actor_id.trim();
        if actor_id.is_empty() {
            return Err(AppError::bad_request("Actor id must not be empty"));
        }
        jwt::create_token(&self.secret, actor_id, false, TOKEN_TYPE_BOOTSTRAP, ttl)
            .map_err(|e| AppError::internal(format!("Failed to issue bootstrap token: {e}")))
    }

    fn anonymous() -> Session {
        Session {
            actor_id: uuid::Uuid::new_v4().to_string(),
            anonymous: true,
        }
    }
}
