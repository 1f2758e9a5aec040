use pretty_assertions::assert_eq;
use shared_types::{AppErrorKind, CaseStatus, Decision, NewCaseRecord, ReviewUpdate};
use std::time::Duration;

use server::store::{CaseStore, PgStore};

/// Connect to `TEST_DATABASE_URL` and migrate. `None` skips the test when
/// no database is configured.
async fn pg_store() -> Option<PgStore> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    server::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Some(PgStore::new(pool))
}

/// Fresh app id so runs never see each other's rows.
fn unique_app() -> String {
    format!(
        "pg-test-{}",
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

fn new_record(name: &str) -> NewCaseRecord {
    NewCaseRecord {
        officer_id: "officer-1".to_string(),
        arrested_user: name.to_string(),
        reason: "Theft".to_string(),
        evidence_urls: vec!["https://a.example/1.png".to_string()],
        court_dates_availability: vec![],
        context_of_incident: None,
    }
}

#[tokio::test]
async fn create_get_and_list_round_trip() {
    let Some(store) = pg_store().await else { return };
    let app = unique_app();

    let created = store.create(&app, new_record("John Doe")).await.unwrap();
    assert_eq!(created.status, CaseStatus::PendingReview);
    assert_eq!(created.court_staff_notes, "");
    assert!(created.review_date.is_none());

    let fetched = store.get(&app, &created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    assert!(store.get("some-other-app", &created.id).await.unwrap().is_none());

    let all = store.list(&app, None).await.unwrap();
    assert_eq!(all.len(), 1);
    let accepted = store.list(&app, Some(CaseStatus::Accepted)).await.unwrap();
    assert!(accepted.is_empty());
}

#[tokio::test]
async fn review_and_notes_update_in_place() {
    let Some(store) = pg_store().await else { return };
    let app = unique_app();
    let created = store.create(&app, new_record("Jane Roe")).await.unwrap();

    let review = ReviewUpdate {
        decision: Decision::Denied,
        notes: "Insufficient evidence.".to_string(),
        reviewer_id: "clerk-7".to_string(),
    };
    let reviewed = store.apply_review(&app, &created.id, &review).await.unwrap();
    assert_eq!(reviewed.status, CaseStatus::Denied);
    assert_eq!(reviewed.reviewer_id.as_deref(), Some("clerk-7"));
    assert!(reviewed.review_date.is_some());

    let noted = store.update_notes(&app, &created.id, "Appealed.").await.unwrap();
    assert_eq!(noted.status, CaseStatus::Denied);
    assert_eq!(noted.court_staff_notes, "Appealed.");

    let err = store.apply_review(&app, "missing", &review).await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotFound);
}

#[tokio::test]
async fn subscription_delivers_fresh_snapshots() {
    let Some(store) = pg_store().await else { return };
    let app = unique_app();

    let mut sub = store.subscribe(&app, None).await.unwrap();
    let first = tokio::time::timeout(Duration::from_secs(5), sub.next_snapshot())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(first.is_empty());

    store.create(&app, new_record("John Doe")).await.unwrap();

    let second = tokio::time::timeout(Duration::from_secs(5), sub.next_snapshot())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].arrested_user, "John Doe");
}
