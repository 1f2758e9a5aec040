use async_trait::async_trait;
use chrono::Utc;
use shared_types::{AppError, CaseRecord, CaseStatus, NewCaseRecord, ReviewUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;

use super::{spawn_feed, CaseStore, CaseSubscription, Change};

const CHANGE_CAPACITY: usize = 64;

/// In-process store. Collections live in a map keyed by app id; every
/// write broadcasts the app id on a change channel.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    cases: RwLock<HashMap<String, Vec<CaseRecord>>>,
    changes: broadcast::Sender<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                cases: RwLock::new(HashMap::new()),
                changes,
            }),
        }
    }

    /// Insert a fully formed record as-is, e.g. imported or fixture data.
    pub async fn insert(&self, app_id: &str, record: CaseRecord) {
        self.inner
            .cases
            .write()
            .await
            .entry(app_id.to_string())
            .or_default()
            .push(record);
        self.announce(app_id);
    }

    fn announce(&self, app_id: &str) {
        // No receivers is fine.
        let _ = self.inner.changes.send(app_id.to_string());
    }

    async fn snapshot(&self, app_id: &str, status: Option<CaseStatus>) -> Vec<CaseRecord> {
        let cases = self.inner.cases.read().await;
        cases
            .get(app_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| status.is_none() || Some(r.status) == status)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn modify<F>(&self, app_id: &str, id: &str, f: F) -> Result<CaseRecord, AppError>
    where
        F: FnOnce(&mut CaseRecord),
    {
        let updated = {
            let mut cases = self.inner.cases.write().await;
            let record = cases
                .get_mut(app_id)
                .and_then(|records| records.iter_mut().find(|r| r.id == id))
                .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;
            f(record);
            record.clone()
        };
        self.announce(app_id);
        Ok(updated)
    }
}

#[async_trait]
impl CaseStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, app_id: &str, new: NewCaseRecord) -> Result<CaseRecord, AppError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let record = CaseRecord::from_new(id, new, Utc::now());
        self.insert(app_id, record.clone()).await;
        Ok(record)
    }

    async fn get(&self, app_id: &str, id: &str) -> Result<Option<CaseRecord>, AppError> {
        let cases = self.inner.cases.read().await;
        Ok(cases
            .get(app_id)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn list(
        &self,
        app_id: &str,
        status: Option<CaseStatus>,
    ) -> Result<Vec<CaseRecord>, AppError> {
        Ok(self.snapshot(app_id, status).await)
    }

    async fn apply_review(
        &self,
        app_id: &str,
        id: &str,
        review: &ReviewUpdate,
    ) -> Result<CaseRecord, AppError> {
        let now = Utc::now();
        self.modify(app_id, id, |record| record.apply_review(review, now))
            .await
    }

    async fn update_notes(
        &self,
        app_id: &str,
        id: &str,
        notes: &str,
    ) -> Result<CaseRecord, AppError> {
        self.modify(app_id, id, |record| record.court_staff_notes = notes.to_string())
            .await
    }

    async fn subscribe(
        &self,
        app_id: &str,
        status: Option<CaseStatus>,
    ) -> Result<CaseSubscription, AppError> {
        let rx = self.inner.changes.subscribe();
        let changes = Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            match rx.recv().await {
                Ok(app) => Some((Ok(Change::App(app)), rx)),
                Err(RecvError::Lagged(_)) => Some((Ok(Change::Resync), rx)),
                Err(RecvError::Closed) => None,
            }
        }));

        let store = self.clone();
        let app = app_id.to_string();
        let load = move || {
            let store = store.clone();
            let app = app.clone();
            async move { Ok(store.snapshot(&app, status).await) }
        };

        Ok(spawn_feed(app_id.to_string(), load, changes))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
