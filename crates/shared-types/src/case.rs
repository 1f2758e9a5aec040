use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AppError;

// ── Status ──────────────────────────────────────────────────────────

/// Workflow state of a case record.
///
/// Every record starts at `PendingReview`. `Accepted` and `Denied` are
/// treated as final by the review screens, but the decide operation does
/// not refuse to overwrite them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CaseStatus {
    #[default]
    #[serde(rename = "Pending Review")]
    PendingReview,
    Accepted,
    Denied,
}

impl CaseStatus {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::PendingReview => "Pending Review",
            CaseStatus::Accepted => "Accepted",
            CaseStatus::Denied => "Denied",
        }
    }

    /// True once a reviewer has moved the case out of `PendingReview`.
    pub fn is_decided(&self) -> bool {
        !matches!(self, CaseStatus::PendingReview)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending Review" | "PendingReview" => Ok(CaseStatus::PendingReview),
            "Accepted" => Ok(CaseStatus::Accepted),
            "Denied" => Ok(CaseStatus::Denied),
            other => Err(AppError::bad_request(format!(
                "Invalid status: {}. Valid values: Pending Review, Accepted, Denied",
                other
            ))),
        }
    }
}

/// Outcome a reviewer may record. Only the two terminal states are legal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Decision {
    Accepted,
    Denied,
}

impl From<Decision> for CaseStatus {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Accepted => CaseStatus::Accepted,
            Decision::Denied => CaseStatus::Denied,
        }
    }
}

// ── Record ──────────────────────────────────────────────────────────

/// One arrest submission and its review outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    pub officer_id: String,
    pub arrested_user: String,
    pub reason: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub evidence_urls: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub court_dates_availability: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_of_incident: Option<String>,
    pub status: CaseStatus,
    pub submission_date: DateTime<Utc>,
    #[serde(default)]
    pub court_staff_notes: String,
    pub review_date: Option<DateTime<Utc>>,
    pub reviewer_id: Option<String>,
}

impl CaseRecord {
    /// Materialize a freshly stored record: pending, no notes, no review.
    pub fn from_new(id: String, new: NewCaseRecord, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            officer_id: new.officer_id,
            arrested_user: new.arrested_user,
            reason: new.reason,
            evidence_urls: new.evidence_urls,
            court_dates_availability: new.court_dates_availability,
            context_of_incident: new.context_of_incident,
            status: CaseStatus::PendingReview,
            submission_date: submitted_at,
            court_staff_notes: String::new(),
            review_date: None,
            reviewer_id: None,
        }
    }

    /// Record a reviewer's decision. Overwrites any earlier decision.
    pub fn apply_review(&mut self, review: &ReviewUpdate, at: DateTime<Utc>) {
        self.status = review.decision.into();
        self.court_staff_notes = review.notes.clone();
        self.reviewer_id = Some(review.reviewer_id.clone());
        self.review_date = Some(at);
    }

    /// Whether the detail view should still offer Accept/Deny.
    pub fn can_decide(&self) -> bool {
        !self.status.is_decided()
    }
}

/// Fields supplied by intake; the store fills in id, status and dates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCaseRecord {
    pub officer_id: String,
    pub arrested_user: String,
    pub reason: String,
    pub evidence_urls: Vec<String>,
    pub court_dates_availability: Vec<String>,
    pub context_of_incident: Option<String>,
}

/// The single-document write performed by a decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub decision: Decision,
    pub notes: String,
    pub reviewer_id: String,
}

/// Split comma-separated form text into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Older records stored a single date string instead of a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => split_list(&s),
        Some(OneOrMany::Many(items)) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    })
}

// ── Request / response types ────────────────────────────────────────

/// Request to accept or deny a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DecisionRequest {
    pub decision: Decision,
    #[serde(default)]
    pub notes: String,
}

/// Request to save reviewer notes without changing status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SaveNotesRequest {
    #[serde(default)]
    pub notes: String,
}

/// Detail view of a single case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CaseDetail {
    #[serde(rename = "case")]
    pub record: CaseRecord,
    pub can_decide: bool,
}

impl From<CaseRecord> for CaseDetail {
    fn from(record: CaseRecord) -> Self {
        let can_decide = record.can_decide();
        Self { record, can_decide }
    }
}
