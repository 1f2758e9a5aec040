use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use shared_types::{CaseRecord, WebhookSection};
use std::time::Duration;
use thiserror::Error;

/// Chat embeds reject field values longer than 1024 characters.
const MAX_FIELD_LEN: usize = 1000;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

const EMBED_TITLE: &str = "New Arrest Submitted!";
const EMBED_DESCRIPTION: &str = "A new arrest has been submitted for review.";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// What gets announced about a new submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseNotification {
    pub case_id: String,
    pub arrested_user: String,
    pub reason: String,
    pub officer_id: String,
}

impl From<&CaseRecord> for CaseNotification {
    fn from(record: &CaseRecord) -> Self {
        Self {
            case_id: record.id.clone(),
            arrested_user: record.arrested_user.clone(),
            reason: record.reason.clone(),
            officer_id: record.officer_id.clone(),
        }
    }
}

/// Best-effort outbound announcement of new cases.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &CaseNotification) -> Result<(), NotifyError>;
}

/// Sink used when no webhook is configured.
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn notify(&self, notification: &CaseNotification) -> Result<(), NotifyError> {
        tracing::debug!(case_id = %notification.case_id, "Webhook disabled, skipping notification");
        Ok(())
    }
}

// ── Payload ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

fn truncate_field(value: &str) -> String {
    if value.chars().count() <= MAX_FIELD_LEN {
        return value.to_string();
    }
    let cut: String = value.chars().take(MAX_FIELD_LEN).collect();
    format!("{cut}...")
}

fn field(name: &str, value: &str, inline: bool) -> EmbedField {
    EmbedField {
        name: name.to_string(),
        value: truncate_field(value),
        inline,
    }
}

/// Build the webhook body announcing `n`.
pub fn build_message(n: &CaseNotification, branding: &WebhookSection) -> WebhookMessage {
    WebhookMessage {
        username: branding.username.clone(),
        avatar_url: branding.avatar_url.clone(),
        embeds: vec![Embed {
            title: EMBED_TITLE.to_string(),
            description: EMBED_DESCRIPTION.to_string(),
            color: branding.color,
            fields: vec![
                field("Arrested User", &n.arrested_user, true),
                field("Reason", &n.reason, true),
                field("Officer ID", &n.officer_id, false),
                field("Case ID", &n.case_id, false),
            ],
            timestamp: Utc::now().to_rfc3339(),
            footer: EmbedFooter {
                text: branding.username.clone(),
            },
        }],
    }
}

// ── Discord-style webhook ───────────────────────────────────────────

pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
    branding: WebhookSection,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, branding: WebhookSection) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            branding,
        }
    }
}

#[async_trait]
impl NotificationSink for DiscordWebhook {
    #[tracing::instrument(skip(self, notification), fields(case_id = %notification.case_id))]
    async fn notify(&self, notification: &CaseNotification) -> Result<(), NotifyError> {
        let message = build_message(notification, &self.branding);
        let response = self
            .client
            .post(&self.url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Server {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Webhook notification sent");
        Ok(())
    }
}
