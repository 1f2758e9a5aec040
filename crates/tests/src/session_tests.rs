use axum::http::StatusCode;
use serde_json::json;

use crate::common::{send_json, sign_in, sign_in_as, test_app};

#[tokio::test]
async fn anonymous_sign_in_issues_token() {
    let test = test_app();

    let (status, body) = send_json(&test.router, "POST", "/api/session", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anonymous"], true);
    assert!(!body["actorId"].as_str().unwrap().is_empty());
    assert!(body["accessToken"].as_str().is_some());
    assert_eq!(body["expiresIn"], 3600);
}

#[tokio::test]
async fn anonymous_sessions_get_distinct_actor_ids() {
    let test = test_app();

    let (_, first) = send_json(&test.router, "POST", "/api/session", None, Some(json!({}))).await;
    let (_, second) = send_json(&test.router, "POST", "/api/session", None, Some(json!({}))).await;
    assert_ne!(first["actorId"], second["actorId"]);
}

#[tokio::test]
async fn bootstrap_token_signs_in_as_subject() {
    let test = test_app();
    let token = sign_in_as(&test, "officer-badge-1234").await;

    let (status, body) = send_json(&test.router, "GET", "/api/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actorId"], "officer-badge-1234");
    assert_eq!(body["anonymous"], false);
    assert!(body.get("accessToken").is_none());
}

#[tokio::test]
async fn invalid_bootstrap_token_falls_back_to_anonymous() {
    let test = test_app();

    let (status, body) = send_json(
        &test.router,
        "POST",
        "/api/session",
        None,
        Some(json!({ "token": "not-a-real-token" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["anonymous"], true);
}

#[tokio::test]
async fn current_session_requires_token() {
    let test = test_app();

    let (status, body) = send_json(&test.router, "GET", "/api/session", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Database not ready or user not authenticated. Please wait."
    );
}

#[tokio::test]
async fn bootstrap_token_is_not_a_session_token() {
    let test = test_app();
    let bootstrap = test
        .identity
        .issue_bootstrap("officer-1", chrono::Duration::minutes(5))
        .unwrap();

    let (status, _) = send_json(&test.router, "GET", "/api/session", Some(&bootstrap), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_signed_with_another_secret_is_rejected() {
    let test = test_app();
    let foreign = server::identity::IdentityProvider::new("another-secret", chrono::Duration::hours(1))
        .sign_in(None)
        .unwrap();

    let (status, _) =
        send_json(&test.router, "GET", "/api/session", Some(&foreign.token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let own = sign_in(&test.router).await;
    let (status, _) = send_json(&test.router, "GET", "/api/session", Some(&own), None).await;
    assert_eq!(status, StatusCode::OK);
}
