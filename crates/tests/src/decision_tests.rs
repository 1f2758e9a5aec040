use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{send_json, sign_in, sign_in_as, submit_case, test_app};

#[tokio::test]
async fn accept_records_reviewer_notes_and_time() {
    let test = test_app();
    let officer = sign_in_as(&test, "officer-1").await;
    let reviewer = sign_in_as(&test, "clerk-7").await;
    let case = submit_case(&test.router, &officer, "John Doe", "Theft").await;
    let id = case["id"].as_str().unwrap();

    let (status, body) = send_json(
        &test.router,
        "POST",
        &format!("/api/cases/{id}/decision"),
        Some(&reviewer),
        Some(json!({ "decision": "Accepted", "notes": "Evidence is clear." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Accepted");
    assert_eq!(body["courtStaffNotes"], "Evidence is clear.");
    assert_eq!(body["reviewerId"], "clerk-7");
    assert!(body["reviewDate"].is_string());
    assert_eq!(body["officerId"], "officer-1");
    assert_eq!(body["submissionDate"], case["submissionDate"]);
}

#[tokio::test]
async fn deny_without_notes_stores_empty_notes() {
    let test = test_app();
    let token = sign_in(&test.router).await;
    let case = submit_case(&test.router, &token, "Jane Roe", "Fraud").await;
    let id = case["id"].as_str().unwrap();

    let (status, body) = send_json(
        &test.router,
        "POST",
        &format!("/api/cases/{id}/decision"),
        Some(&token),
        Some(json!({ "decision": "Denied" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Denied");
    assert_eq!(body["courtStaffNotes"], "");
}

#[tokio::test]
async fn redeciding_overwrites_previous_outcome() {
    let test = test_app();
    let token = sign_in(&test.router).await;
    let case = submit_case(&test.router, &token, "John Doe", "Theft").await;
    let uri = format!("/api/cases/{}/decision", case["id"].as_str().unwrap());

    send_json(&test.router, "POST", &uri, Some(&token), Some(json!({ "decision": "Accepted" }))).await;
    let (status, body) = send_json(
        &test.router,
        "POST",
        &uri,
        Some(&token),
        Some(json!({ "decision": "Denied", "notes": "Reconsidered." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Denied");
    assert_eq!(body["courtStaffNotes"], "Reconsidered.");
}

#[tokio::test]
async fn pending_is_not_a_legal_decision() {
    let test = test_app();
    let token = sign_in(&test.router).await;
    let case = submit_case(&test.router, &token, "John Doe", "Theft").await;

    let (status, _) = send_json(
        &test.router,
        "POST",
        &format!("/api/cases/{}/decision", case["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({ "decision": "Pending Review" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn deciding_unknown_case_is_not_found() {
    let test = test_app();
    let token = sign_in(&test.router).await;

    let (status, body) = send_json(
        &test.router,
        "POST",
        "/api/cases/missing/decision",
        Some(&token),
        Some(json!({ "decision": "Accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
}

#[tokio::test]
async fn deciding_requires_session() {
    let test = test_app();
    let token = sign_in(&test.router).await;
    let case = submit_case(&test.router, &token, "John Doe", "Theft").await;

    let (status, _) = send_json(
        &test.router,
        "POST",
        &format!("/api/cases/{}/decision", case["id"].as_str().unwrap()),
        None,
        Some(json!({ "decision": "Accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn saving_notes_leaves_status_alone() {
    let test = test_app();
    let token = sign_in(&test.router).await;
    let case = submit_case(&test.router, &token, "John Doe", "Theft").await;
    let id = case["id"].as_str().unwrap();

    let (status, body) = send_json(
        &test.router,
        "PATCH",
        &format!("/api/cases/{id}/notes"),
        Some(&token),
        Some(json!({ "notes": "Waiting on bodycam." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["courtStaffNotes"], "Waiting on bodycam.");
    assert_eq!(body["status"], "Pending Review");
    assert_eq!(body["reviewerId"], serde_json::Value::Null);
}
