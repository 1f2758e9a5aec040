use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{AppError, CaseRecord, CaseStatus, NewCaseRecord, ReviewUpdate};
use sqlx::postgres::PgListener;
use sqlx::{Pool, Postgres};

use super::{spawn_feed, CaseStore, CaseSubscription, Change};
use crate::error_convert::SqlxErrorExt;

/// Channel the `arrest_cases` trigger notifies with the changed app id.
pub const CHANGE_CHANNEL: &str = "arrest_cases_changed";

const CASE_COLUMNS: &str = "id, officer_id, arrested_user, reason, evidence_urls, \
     court_dates_availability, context_of_incident, status, submission_date, \
     court_staff_notes, review_date, reviewer_id";

#[derive(Debug, sqlx::FromRow)]
struct CaseRow {
    id: String,
    officer_id: String,
    arrested_user: String,
    reason: String,
    evidence_urls: Vec<String>,
    court_dates_availability: Vec<String>,
    context_of_incident: Option<String>,
    status: String,
    submission_date: DateTime<Utc>,
    court_staff_notes: String,
    review_date: Option<DateTime<Utc>>,
    reviewer_id: Option<String>,
}

impl TryFrom<CaseRow> for CaseRecord {
    type Error = AppError;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        let status: CaseStatus = row
            .status
            .parse()
            .map_err(|_| AppError::database(format!("Unknown status '{}' on case {}", row.status, row.id)))?;
        Ok(CaseRecord {
            id: row.id,
            officer_id: row.officer_id,
            arrested_user: row.arrested_user,
            reason: row.reason,
            evidence_urls: row.evidence_urls,
            court_dates_availability: row.court_dates_availability,
            context_of_incident: row.context_of_incident,
            status,
            submission_date: row.submission_date,
            court_staff_notes: row.court_staff_notes,
            review_date: row.review_date,
            reviewer_id: row.reviewer_id,
        })
    }
}

fn rows_to_records(rows: Vec<CaseRow>) -> Result<Vec<CaseRecord>, AppError> {
    rows.into_iter().map(CaseRecord::try_from).collect()
}

/// Map a listener result to a feed signal. No payload means the listener
/// lost its connection.
fn change_for(payload: Option<&str>) -> Change {
    match payload {
        Some(app_id) => Change::App(app_id.to_string()),
        None => Change::Resync,
    }
}

/// PostgreSQL-backed store using the `arrest_cases` table.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn load(pool: &Pool<Postgres>, app_id: &str, status: Option<CaseStatus>) -> Result<Vec<CaseRecord>, AppError> {
        let sql = format!(
            "SELECT {CASE_COLUMNS} FROM arrest_cases \
             WHERE app_id = $1 AND ($2::TEXT IS NULL OR status = $2)"
        );
        let rows = sqlx::query_as::<_, CaseRow>(&sql)
            .bind(app_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        rows_to_records(rows)
    }
}

#[async_trait]
impl CaseStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, app_id: &str, new: NewCaseRecord) -> Result<CaseRecord, AppError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let sql = format!(
            "INSERT INTO arrest_cases \
                 (id, app_id, officer_id, arrested_user, reason, evidence_urls, \
                  court_dates_availability, context_of_incident) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {CASE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CaseRow>(&sql)
            .bind(&id)
            .bind(app_id)
            .bind(&new.officer_id)
            .bind(&new.arrested_user)
            .bind(&new.reason)
            .bind(&new.evidence_urls)
            .bind(&new.court_dates_availability)
            .bind(&new.context_of_incident)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        row.try_into()
    }

    async fn get(&self, app_id: &str, id: &str) -> Result<Option<CaseRecord>, AppError> {
        let sql = format!("SELECT {CASE_COLUMNS} FROM arrest_cases WHERE app_id = $1 AND id = $2");
        let row = sqlx::query_as::<_, CaseRow>(&sql)
            .bind(app_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        row.map(CaseRecord::try_from).transpose()
    }

    async fn list(
        &self,
        app_id: &str,
        status: Option<CaseStatus>,
    ) -> Result<Vec<CaseRecord>, AppError> {
        Self::load(&self.pool, app_id, status).await
    }

    async fn apply_review(
        &self,
        app_id: &str,
        id: &str,
        review: &ReviewUpdate,
    ) -> Result<CaseRecord, AppError> {
        let status: CaseStatus = review.decision.into();
        let sql = format!(
            "UPDATE arrest_cases \
             SET status = $3, court_staff_notes = $4, reviewer_id = $5, review_date = NOW() \
             WHERE app_id = $1 AND id = $2 \
             RETURNING {CASE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CaseRow>(&sql)
            .bind(app_id)
            .bind(id)
            .bind(status.as_str())
            .bind(&review.notes)
            .bind(&review.reviewer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?
            .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;
        row.try_into()
    }

    async fn update_notes(
        &self,
        app_id: &str,
        id: &str,
        notes: &str,
    ) -> Result<CaseRecord, AppError> {
        let sql = format!(
            "UPDATE arrest_cases SET court_staff_notes = $3 \
             WHERE app_id = $1 AND id = $2 \
             RETURNING {CASE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CaseRow>(&sql)
            .bind(app_id)
            .bind(id)
            .bind(notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?
            .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;
        row.try_into()
    }

    async fn subscribe(
        &self,
        app_id: &str,
        status: Option<CaseStatus>,
    ) -> Result<CaseSubscription, AppError> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;

        let changes = Box::pin(futures::stream::unfold(
            Some(listener),
            |listener| async move {
                let mut listener = listener?;
                // `Ok(None)` means the connection dropped and notifications
                // may have been missed; the next call reconnects.
                match listener.try_recv().await {
                    Ok(received) => Some((
                        Ok(change_for(received.as_ref().map(|n| n.payload()))),
                        Some(listener),
                    )),
                    Err(e) => Some((Err(e.into_app_error()), None)),
                }
            },
        ));

        let pool = self.pool.clone();
        let app = app_id.to_string();
        let load = move || {
            let pool = pool.clone();
            let app = app.clone();
            async move { PgStore::load(&pool, &app, status).await }
        };

        Ok(spawn_feed(app_id.to_string(), load, changes))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        Ok(())
    }
}
