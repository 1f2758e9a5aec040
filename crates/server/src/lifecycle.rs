use shared_types::{AppError, CaseRecord, Decision, ReviewUpdate};

use crate::identity::Session;
use crate::store::CaseStore;

/// Record a reviewer's decision on a case.
///
/// Any session may decide. Deciding an already decided case overwrites
/// the earlier outcome; the previous status is logged.
pub async fn decide(
    store: &dyn CaseStore,
    app_id: &str,
    session: &Session,
    case_id: &str,
    decision: Decision,
    notes: &str,
) -> Result<CaseRecord, AppError> {
    let current = store
        .get(app_id, case_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {case_id} not found")))?;

    if current.status.is_decided() {
        tracing::info!(
            case_id,
            previous = %current.status,
            reviewer = %session.actor_id,
            "Overwriting earlier decision"
        );
    }

    let review = ReviewUpdate {
        decision,
        notes: notes.to_string(),
        reviewer_id: session.actor_id.clone(),
    };
    let updated = store.apply_review(app_id, case_id, &review).await?;
    tracing::info!(case_id, status = %updated.status, reviewer = %session.actor_id, "Case decided");
    Ok(updated)
}

/// Save reviewer notes without touching status or review fields.
pub async fn save_notes(
    store: &dyn CaseStore,
    app_id: &str,
    case_id: &str,
    notes: &str,
) -> Result<CaseRecord, AppError> {
    store.update_notes(app_id, case_id, notes).await
}
