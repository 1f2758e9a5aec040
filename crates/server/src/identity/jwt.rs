use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token type discriminator. A bootstrap token only buys a session; it is
/// never accepted as a bearer token, and vice versa.
pub const TOKEN_TYPE_SESSION: &str = "session";
pub const TOKEN_TYPE_BOOTSTRAP: &str = "bootstrap";

/// JWT claims carried by both session and bootstrap tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Opaque actor id.
    pub sub: String,
    #[serde(default)]
    pub anonymous: bool,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default)]
    pub typ: String,
}

pub fn create_token(
    secret: &[u8],
    actor_id: &str,
    anonymous: bool,
    typ: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: actor_id.to_string(),
        anonymous,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: Some(uuid::Uuid::new_v4().to_string()),
        typ: typ.to_string(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

/// Decode and verify a token, requiring the given `typ`.
pub fn validate_token(
    secret: &[u8],
    token: &str,
    expected_typ: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    if token_data.claims.typ != expected_typ || token_data.claims.sub.trim().is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(token_data.claims)
}
