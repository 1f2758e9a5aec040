use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::case::{split_list, NewCaseRecord};
use crate::AppError;

/// Raw officer input exactly as typed into the intake form.
///
/// List fields arrive as comma-separated text and are only split when the
/// form is turned into a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeForm {
    pub arrested_user: String,
    pub reason: String,
    pub evidence_urls: String,
    pub court_dates_availability: String,
    pub context_of_incident: String,
    /// Labels picked from the charge catalog. Used as the reason when the
    /// reason box is left blank.
    pub charges: Vec<String>,
}

impl IntakeForm {
    /// Trimmed reason text, or the selected charges joined with ", ".
    pub fn effective_reason(&self) -> String {
        let typed = self.reason.trim();
        if !typed.is_empty() {
            return typed.to_string();
        }
        self.charges
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Add a charge label once, keeping selection order.
    pub fn add_charge(&mut self, label: &str) {
        if !self.charges.iter().any(|c| c == label) {
            self.charges.push(label.to_string());
        }
    }

    pub fn remove_charge(&mut self, label: &str) {
        self.charges.retain(|c| c != label);
    }

    /// Check the required fields. Nothing is written when this fails.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut field_errors = HashMap::new();
        if self.arrested_user.trim().is_empty() {
            field_errors.insert(
                "arrestedUser".to_string(),
                "Arrested User is required.".to_string(),
            );
        }
        if self.effective_reason().is_empty() {
            field_errors.insert("reason".to_string(), "Reason is required.".to_string());
        }
        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(
                "Arrested User and Reason are required.",
                field_errors,
            ))
        }
    }

    /// Validate and derive the record to persist for `officer_id`.
    pub fn to_new_record(&self, officer_id: &str) -> Result<NewCaseRecord, AppError> {
        self.validate()?;
        let context = self.context_of_incident.trim();
        Ok(NewCaseRecord {
            officer_id: officer_id.to_string(),
            arrested_user: self.arrested_user.trim().to_string(),
            reason: self.effective_reason(),
            evidence_urls: split_list(&self.evidence_urls),
            court_dates_availability: split_list(&self.court_dates_availability),
            context_of_incident: (!context.is_empty()).then(|| context.to_string()),
        })
    }

    /// Reset every field after a successful submission.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
