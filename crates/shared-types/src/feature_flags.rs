use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional integrations are active.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false` so that a missing or incomplete config file runs the service
/// against the in-memory store with no outbound calls.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeatureFlags {
    #[serde(default)]
    pub postgres: bool,
    #[serde(default)]
    pub webhook: bool,
    #[serde(default)]
    pub summarizer: bool,
    #[serde(default)]
    pub telemetry: bool,
}

/// `[app]` section: deployment scoping and session lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSection {
    #[serde(default = "default_app_id")]
    pub default_app_id: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            default_app_id: default_app_id(),
            bind_addr: default_bind_addr(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

fn default_app_id() -> String {
    "default-app-id".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24
}

/// `[webhook]` section: how new-submission announcements are branded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookSection {
    #[serde(default = "default_webhook_username")]
    pub username: String,
    #[serde(default = "default_avatar_url")]
    pub avatar_url: String,
    #[serde(default = "default_embed_color")]
    pub color: u32,
}

impl Default for WebhookSection {
    fn default() -> Self {
        Self {
            username: default_webhook_username(),
            avatar_url: default_avatar_url(),
            color: default_embed_color(),
        }
    }
}

fn default_webhook_username() -> String {
    "Arrest Management System".to_string()
}

fn default_avatar_url() -> String {
    "https://placehold.co/128x128/007bff/ffffff?text=AMS".to_string()
}

fn default_embed_color() -> u32 {
    3447003
}

/// `[summarizer]` section: text-generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummarizerSection {
    #[serde(default = "default_summarizer_base_url")]
    pub base_url: String,
    #[serde(default = "default_summarizer_model")]
    pub model: String,
}

impl Default for SummarizerSection {
    fn default() -> Self {
        Self {
            base_url: default_summarizer_base_url(),
            model: default_summarizer_model(),
        }
    }
}

fn default_summarizer_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_summarizer_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub webhook: WebhookSection,
    #[serde(default)]
    pub summarizer: SummarizerSection,
}
