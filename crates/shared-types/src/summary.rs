use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Ready,
    Error,
}

/// Result panel for an on-demand case summary.
///
/// A failed generation is a normal response with `status: error`; the
/// next attempt replaces the panel entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SummaryPanel {
    pub status: SummaryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryPanel {
    pub fn ready(text: impl Into<String>) -> Self {
        Self {
            status: SummaryStatus::Ready,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SummaryStatus::Error,
            text: None,
            error: Some(message.into()),
        }
    }
}
