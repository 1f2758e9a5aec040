use serde::{Deserialize, Serialize};

/// Request body for `POST /api/session`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignInRequest {
    /// Bootstrap token handed to the client by the deployment. When absent
    /// or invalid the caller is signed in anonymously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Established session as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Opaque actor id stamped on submissions and reviews.
    pub actor_id: String,
    pub anonymous: bool,
    /// Bearer token for subsequent requests. Omitted when echoing the
    /// current session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}
