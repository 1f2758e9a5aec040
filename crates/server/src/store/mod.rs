pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use shared_types::{AppError, CaseRecord, CaseStatus, NewCaseRecord, ReviewUpdate};
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Snapshots buffered per subscriber before the feed task waits.
const FEED_BUFFER: usize = 16;

/// One full snapshot of a collection, or the error that interrupted it.
pub type Snapshot = Result<Vec<CaseRecord>, AppError>;

// ── Trait ────────────────────────────────────────────────────────────

/// Persistent collection of case records, scoped by `app_id`.
///
/// Single-record writes are atomic. There is no delete.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Short backend name for health output.
    fn backend(&self) -> &'static str;

    /// Persist a new record. The store assigns the id and submission time.
    async fn create(&self, app_id: &str, new: NewCaseRecord) -> Result<CaseRecord, AppError>;

    /// Point read.
    async fn get(&self, app_id: &str, id: &str) -> Result<Option<CaseRecord>, AppError>;

    /// Every record, optionally restricted to one status. Unordered.
    async fn list(
        &self,
        app_id: &str,
        status: Option<CaseStatus>,
    ) -> Result<Vec<CaseRecord>, AppError>;

    /// Write status, notes, reviewer and review time (store clock).
    /// `NotFound` if the id does not exist.
    async fn apply_review(
        &self,
        app_id: &str,
        id: &str,
        review: &ReviewUpdate,
    ) -> Result<CaseRecord, AppError>;

    /// Overwrite only the reviewer notes.
    async fn update_notes(&self, app_id: &str, id: &str, notes: &str)
        -> Result<CaseRecord, AppError>;

    /// Standing query: an initial snapshot, then a fresh one after every
    /// change in `app_id`. Dropping the subscription stops it.
    async fn subscribe(
        &self,
        app_id: &str,
        status: Option<CaseStatus>,
    ) -> Result<CaseSubscription, AppError>;

    /// Reachability check.
    async fn ping(&self) -> Result<(), AppError>;
}

// ── Subscription ────────────────────────────────────────────────────

/// A change signal from a backend's notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Something in this app's collection changed.
    App(String),
    /// Signals were lost; every subscriber should reload.
    Resync,
}

/// Handle on a standing query. Yields full snapshots; consumers replace
/// their list wholesale on each one.
pub struct CaseSubscription {
    rx: mpsc::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl CaseSubscription {
    /// Wait for the next snapshot. `None` once the feed has ended.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }
}

impl Drop for CaseSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the feed task behind a subscription.
///
/// `changes` must already be listening when this is called so that nothing
/// written after the initial load is missed.
pub(crate) fn spawn_feed<L, Fut, C>(app_id: String, mut load: L, mut changes: C) -> CaseSubscription
where
    L: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Snapshot> + Send,
    C: Stream<Item = Result<Change, AppError>> + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel(FEED_BUFFER);
    let task = tokio::spawn(async move {
        if tx.send(load().await).await.is_err() {
            return;
        }
        while let Some(change) = changes.next().await {
            match change {
                Ok(Change::App(changed)) if changed != app_id => continue,
                Ok(_) => {
                    if tx.send(load().await).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(app_id = %app_id, error = %e, "Case feed interrupted");
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }
        tracing::debug!(app_id = %app_id, "Case feed ended");
    });
    CaseSubscription { rx, task }
}
