use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::case::{CaseRecord, CaseStatus};
use crate::AppError;

/// Status dropdown on the review dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum StatusFilter {
    #[default]
    All,
    #[serde(rename = "Pending Review")]
    PendingReview,
    Accepted,
    Denied,
}

impl StatusFilter {
    pub fn status(&self) -> Option<CaseStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::PendingReview => Some(CaseStatus::PendingReview),
            StatusFilter::Accepted => Some(CaseStatus::Accepted),
            StatusFilter::Denied => Some(CaseStatus::Denied),
        }
    }

    pub fn matches(&self, status: CaseStatus) -> bool {
        match self.status() {
            None => true,
            Some(s) => s == status,
        }
    }
}

impl From<CaseStatus> for StatusFilter {
    fn from(s: CaseStatus) -> Self {
        match s {
            CaseStatus::PendingReview => StatusFilter::PendingReview,
            CaseStatus::Accepted => StatusFilter::Accepted,
            CaseStatus::Denied => StatusFilter::Denied,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            None => f.write_str("All"),
            Some(s) => f.write_str(s.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<CaseStatus>().map(StatusFilter::from)
    }
}

/// Current search boxes and status filter.
///
/// Only one search box is active at a time: typing into one clears the
/// other, and when both are somehow set the case-ID term wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub status: StatusFilter,
    pub search_id: String,
    pub search_name: String,
}

impl DashboardQuery {
    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn set_search_id(&mut self, term: &str) {
        self.search_id = term.to_string();
        if !term.is_empty() {
            self.search_name.clear();
        }
    }

    pub fn set_search_name(&mut self, term: &str) {
        self.search_name = term.to_string();
        if !term.is_empty() {
            self.search_id.clear();
        }
    }

    /// Whether `record` survives the search terms and status filter.
    pub fn matches(&self, record: &CaseRecord) -> bool {
        let id_term = self.search_id.to_lowercase();
        let name_term = self.search_name.to_lowercase();
        let by_search = if !id_term.is_empty() {
            record.id.to_lowercase().contains(&id_term)
        } else if !name_term.is_empty() {
            record.arrested_user.to_lowercase().contains(&name_term)
        } else {
            true
        };
        by_search && self.status.matches(record.status)
    }

    /// Filter an already sorted snapshot, preserving order.
    pub fn apply(&self, records: &[CaseRecord]) -> Vec<CaseRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Order a snapshot newest submission first.
pub fn sort_newest_first(records: &mut [CaseRecord]) {
    records.sort_by(|a, b| b.submission_date.cmp(&a.submission_date));
}

/// Per-status totals over an unfiltered snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub denied: usize,
}

impl StatusCounts {
    pub fn tally(records: &[CaseRecord]) -> Self {
        records.iter().fold(Self::default(), |mut c, r| {
            c.total += 1;
            match r.status {
                CaseStatus::PendingReview => c.pending += 1,
                CaseStatus::Accepted => c.accepted += 1,
                CaseStatus::Denied => c.denied += 1,
            }
            c
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

/// Message strip shown above the case table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

/// What the dashboard renders: the filtered table plus summary chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardView {
    pub cases: Vec<CaseRecord>,
    pub counts: StatusCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
}

impl DashboardView {
    /// Build a view from an unsorted snapshot.
    pub fn build(mut snapshot: Vec<CaseRecord>, query: &DashboardQuery, banner: Option<Banner>) -> Self {
        sort_newest_first(&mut snapshot);
        Self {
            counts: StatusCounts::tally(&snapshot),
            cases: query.apply(&snapshot),
            banner,
        }
    }
}

/// Query parameters for the case list and live feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct CaseListParams {
    /// `All`, `Pending Review`, `Accepted` or `Denied`.
    pub status: Option<String>,
    /// Case-insensitive substring of the case id.
    pub case_id: Option<String>,
    /// Case-insensitive substring of the arrested user's name.
    pub name: Option<String>,
}

impl CaseListParams {
    pub fn to_query(&self) -> Result<DashboardQuery, AppError> {
        let mut query = DashboardQuery::default();
        if let Some(status) = &self.status {
            query.set_status_filter(status.parse()?);
        }
        if let Some(name) = &self.name {
            query.set_search_name(name);
        }
        // Applied last so a non-empty id term clears the name term.
        if let Some(id) = &self.case_id {
            if !id.is_empty() {
                query.set_search_id(id);
            }
        }
        Ok(query)
    }
}

/// Response body for `GET /api/cases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseListResponse {
    pub cases: Vec<CaseRecord>,
    pub total: usize,
    pub counts: StatusCounts,
}

impl From<DashboardView> for CaseListResponse {
    fn from(view: DashboardView) -> Self {
        Self {
            total: view.cases.len(),
            cases: view.cases,
            counts: view.counts,
        }
    }
}
