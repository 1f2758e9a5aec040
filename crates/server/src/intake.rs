use shared_types::{AppError, CaseRecord, IntakeForm};
use std::sync::Arc;

use crate::identity::Session;
use crate::notify::{CaseNotification, NotificationSink};
use crate::store::CaseStore;

/// Turns officer form input into stored case records.
pub struct IntakeController {
    store: Arc<dyn CaseStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl IntakeController {
    pub fn new(store: Arc<dyn CaseStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Validate, persist, announce, then clear `form`.
    ///
    /// Validation and store failures leave the form untouched. The
    /// announcement runs on its own task; a failure there is only logged.
    pub async fn submit(
        &self,
        app_id: &str,
        session: &Session,
        form: &mut IntakeForm,
    ) -> Result<CaseRecord, AppError> {
        let new = form.to_new_record(&session.actor_id)?;
        let record = self.store.create(app_id, new).await.inspect_err(|e| {
            tracing::error!(app_id, error = %e, "Error submitting arrest");
        })?;
        tracing::info!(app_id, case_id = %record.id, officer = %record.officer_id, "Arrest submitted");

        // Fire-and-forget: a slow or failing webhook never holds up the response.
        let notifier = Arc::clone(&self.notifier);
        let notification = CaseNotification::from(&record);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&notification).await {
                tracing::warn!(case_id = %notification.case_id, error = %e, "Failed to send new-case notification");
            }
        });

        form.clear();
        Ok(record)
    }
}
