use serde::{Deserialize, Serialize};
use shared_types::{CaseRecord, SummarizerSection, SummaryPanel};
use thiserror::Error;

const PROMPT_PREAMBLE: &str = "Summarize the following arrest case details concisely, \
focusing on the key facts for a court staff member. Include the arrested user, reason, \
evidence, and court availability.";

const NONE_PROVIDED: &str = "None provided.";

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Failed to generate summary. Please try again.")]
    Http(#[from] reqwest::Error),
    #[error("Failed to generate summary. Please try again.")]
    Server { status: u16, body: String },
    #[error("Could not generate summary. Unexpected AI response.")]
    UnexpectedResponse,
}

impl From<SummaryError> for SummaryPanel {
    fn from(err: SummaryError) -> Self {
        SummaryPanel::error(err.to_string())
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ── Prompt ──────────────────────────────────────────────────────────

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE_PROVIDED.to_string()
    } else {
        items.join(", ")
    }
}

/// Fixed-template prompt describing one case.
pub fn build_prompt(record: &CaseRecord) -> String {
    let context = record
        .context_of_incident
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NONE_PROVIDED);
    format!(
        "{PROMPT_PREAMBLE}\n\
         Arrested User: {}\n\
         Reason for Arrest: {}\n\
         Evidence: {}\n\
         Court Dates Availability: {}\n\
         Officer ID: {}\n\
         Submission Date: {}\n\
         Context of Incident: {}\n",
        record.arrested_user,
        record.reason,
        list_or_none(&record.evidence_urls),
        list_or_none(&record.court_dates_availability),
        record.officer_id,
        record.submission_date.format("%Y-%m-%d %H:%M UTC"),
        context,
    )
}

// ── Client ──────────────────────────────────────────────────────────

/// Client for a Gemini-style `generateContent` endpoint.
pub struct SummarizationClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl SummarizationClient {
    pub fn new(section: &SummarizerSection, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: section.base_url.trim_end_matches('/').to_string(),
            model: section.model.clone(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Generate a narrative summary of `record`. No retries.
    #[tracing::instrument(skip(self, record), fields(case_id = %record.id, model = %self.model))]
    pub async fn summarize(&self, record: &CaseRecord) -> Result<String, SummaryError> {
        let prompt = build_prompt(record);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "Summarization request failed");
            return Err(SummaryError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&raw).unwrap_or_default();
        match parsed.first_text() {
            Some(text) => Ok(text),
            None => {
                tracing::error!(body = %raw, "Summarization response structure unexpected");
                Err(SummaryError::UnexpectedResponse)
            }
        }
    }

    /// Summarize and render the outcome as a panel.
    pub async fn summary_panel(&self, record: &CaseRecord) -> SummaryPanel {
        match self.summarize(record).await {
            Ok(text) => SummaryPanel::ready(text),
            Err(e) => e.into(),
        }
    }
}
