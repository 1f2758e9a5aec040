use shared_types::{
    sort_newest_first, AppError, Banner, CaseDetail, CaseRecord, DashboardQuery, DashboardView,
    Decision, StatusCounts, StatusFilter,
};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::identity::Session;
use crate::lifecycle;
use crate::store::CaseStore;

/// Latest state of the live feed behind a dashboard.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    /// Newest submission first.
    pub records: Vec<CaseRecord>,
    pub error: Option<String>,
    pub loaded: bool,
}

/// Live review dashboard for one app id.
///
/// Holds a standing subscription for as long as it lives; dropping the
/// dashboard releases it.
pub struct ReviewDashboard {
    store: Arc<dyn CaseStore>,
    app_id: String,
    query: DashboardQuery,
    feed: watch::Receiver<FeedState>,
    task: JoinHandle<()>,
    selected: Option<String>,
    banner: Option<Banner>,
}

impl ReviewDashboard {
    pub async fn open(store: Arc<dyn CaseStore>, app_id: &str) -> Result<Self, AppError> {
        let mut subscription = store.subscribe(app_id, None).await?;
        let (tx, feed) = watch::channel(FeedState::default());

        let task = tokio::spawn(async move {
            while let Some(snapshot) = subscription.next_snapshot().await {
                match snapshot {
                    Ok(mut records) => {
                        sort_newest_first(&mut records);
                        tx.send_replace(FeedState {
                            records,
                            error: None,
                            loaded: true,
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Error fetching arrests");
                        tx.send_modify(|state| {
                            state.error = Some(e.message.clone());
                            state.loaded = true;
                        });
                    }
                }
            }
        });

        Ok(Self {
            store,
            app_id: app_id.to_string(),
            query: DashboardQuery::default(),
            feed,
            task,
            selected: None,
            banner: None,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn query(&self) -> &DashboardQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: DashboardQuery) {
        self.query = query;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.query.set_status_filter(status);
    }

    pub fn set_search_id(&mut self, term: &str) {
        self.query.set_search_id(term);
    }

    pub fn set_search_name(&mut self, term: &str) {
        self.query.set_search_name(term);
    }

    /// Wait until the first snapshot has arrived.
    pub async fn ready(&mut self) -> Result<(), AppError> {
        self.feed
            .wait_for(|state| state.loaded)
            .await
            .map(|_| ())
            .map_err(|_| AppError::internal("Case feed closed"))
    }

    /// Wait for the next snapshot. Errors once the feed has closed.
    pub async fn changed(&mut self) -> Result<(), AppError> {
        self.feed
            .changed()
            .await
            .map_err(|_| AppError::internal("Case feed closed"))
    }

    /// Filtered cases, counts and the current banner. A feed error shows
    /// as an error banner unless an operation banner is already up.
    pub fn view(&self) -> DashboardView {
        let state = self.feed.borrow();
        let banner = self.banner.clone().or_else(|| {
            state
                .error
                .as_ref()
                .map(|e| Banner::error(format!("Error loading cases: {e}")))
        });
        DashboardView {
            cases: self.query.apply(&state.records),
            counts: StatusCounts::tally(&state.records),
            banner,
        }
    }

    /// Open the detail view for `case_id`.
    pub async fn review_case(&mut self, case_id: &str) -> Result<CaseDetail, AppError> {
        let cached = self
            .feed
            .borrow()
            .records
            .iter()
            .find(|r| r.id == case_id)
            .cloned();
        let record = match cached {
            Some(record) => record,
            None => self
                .store
                .get(&self.app_id, case_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Case {case_id} not found")))?,
        };
        self.selected = Some(record.id.clone());
        Ok(CaseDetail::from(record))
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Accept or deny a case. Success closes the detail view; either way
    /// the outcome lands in the banner.
    pub async fn decide(
        &mut self,
        session: &Session,
        case_id: &str,
        decision: Decision,
        notes: &str,
    ) -> Result<CaseRecord, AppError> {
        let result =
            lifecycle::decide(self.store.as_ref(), &self.app_id, session, case_id, decision, notes)
                .await;
        match &result {
            Ok(record) => {
                self.selected = None;
                self.banner = Some(Banner::success(format!(
                    "Case {} updated to {}.",
                    record.id, record.status
                )));
            }
            Err(e) => {
                self.banner = Some(Banner::error(format!(
                    "Error updating case status: {}",
                    e.message
                )));
            }
        }
        result
    }

    /// Save notes on the open case without deciding it.
    pub async fn save_notes(&mut self, case_id: &str, notes: &str) -> Result<CaseRecord, AppError> {
        let result = lifecycle::save_notes(self.store.as_ref(), &self.app_id, case_id, notes).await;
        self.banner = Some(match &result {
            Ok(record) => Banner::success(format!("Notes saved for case {}.", record.id)),
            Err(e) => Banner::error(format!("Error saving notes: {}", e.message)),
        });
        result
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}

impl Drop for ReviewDashboard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
