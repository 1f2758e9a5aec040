use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use server::store::CaseStore;

use crate::common::{send_for_app, send_json, sign_in_as, submit_case, test_app, APP, OTHER_APP};

#[tokio::test]
async fn submit_requires_session() {
    let test = test_app();

    let (status, body) = send_json(
        &test.router,
        "POST",
        "/api/cases",
        None,
        Some(json!({ "arrestedUser": "John Doe", "reason": "Theft" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
    assert!(test.store.list(APP, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn submit_creates_pending_record_stamped_with_officer() {
    let test = test_app();
    let token = sign_in_as(&test, "officer-badge-1234").await;

    let (status, body) = send_json(
        &test.router,
        "POST",
        "/api/cases",
        Some(&token),
        Some(json!({
            "arrestedUser": "  John Doe ",
            "reason": "Theft",
            "evidenceUrls": "https://a.example/1.png, , bodycam clip",
            "courtDatesAvailability": "2025-08-10,2025-08-15",
            "contextOfIncident": "Fled on foot"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["arrestedUser"], "John Doe");
    assert_eq!(body["officerId"], "officer-badge-1234");
    assert_eq!(body["status"], "Pending Review");
    assert_eq!(body["courtStaffNotes"], "");
    assert_eq!(body["reviewDate"], serde_json::Value::Null);
    assert_eq!(body["reviewerId"], serde_json::Value::Null);
    assert_eq!(
        body["evidenceUrls"],
        json!(["https://a.example/1.png", "bodycam clip"])
    );
    assert_eq!(
        body["courtDatesAvailability"],
        json!(["2025-08-10", "2025-08-15"])
    );
    assert_eq!(body["contextOfIncident"], "Fled on foot");

    let stored = test.store.list(APP, None).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, body["id"].as_str().unwrap());
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let test = test_app();
    let token = sign_in_as(&test, "officer-1").await;

    let (status, body) = send_json(
        &test.router,
        "POST",
        "/api/cases",
        Some(&token),
        Some(json!({ "arrestedUser": "", "reason": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Arrested User and Reason are required.");
    assert_eq!(body["field_errors"]["arrestedUser"], "Arrested User is required.");
    assert_eq!(body["field_errors"]["reason"], "Reason is required.");
    assert!(test.store.list(APP, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn selected_charges_stand_in_for_reason() {
    let test = test_app();
    let token = sign_in_as(&test, "officer-1").await;

    let (status, body) = send_json(
        &test.router,
        "POST",
        "/api/cases",
        Some(&token),
        Some(json!({
            "arrestedUser": "Jane Roe",
            "charges": ["DUI - 4.1-01 [CLASS 1 MISDEMEANOR]", "Reckless Driving - 4.2-01 [CLASS 2 MISDEMEANOR]"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["reason"],
        "DUI - 4.1-01 [CLASS 1 MISDEMEANOR], Reckless Driving - 4.2-01 [CLASS 2 MISDEMEANOR]"
    );
    assert_eq!(body["evidenceUrls"], json!([]));
}

#[tokio::test]
async fn records_are_scoped_to_app_id() {
    let test = test_app();
    let token = sign_in_as(&test, "officer-1").await;
    submit_case(&test.router, &token, "John Doe", "Theft").await;

    let (status, body) =
        send_for_app(&test.router, OTHER_APP, "GET", "/api/cases", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let (_, body) = send_json(&test.router, "GET", "/api/cases", Some(&token), None).await;
    assert_eq!(body["total"], 1);
}
