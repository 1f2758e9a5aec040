use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{send_json, test_app};

#[tokio::test]
async fn full_catalog_without_term() {
    let test = test_app();
    let (status, body) = send_json(&test.router, "GET", "/api/charges", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 15);
    assert_eq!(body[0], "Murder - 1.2-01 [CLASS 2 FELONY]");
}

#[tokio::test]
async fn term_filters_case_insensitively() {
    let test = test_app();
    let (_, body) = send_json(&test.router, "GET", "/api/charges?q=THEFT", None, None).await;
    assert_eq!(
        body,
        json!(["Theft - 2.1-01 [CLASS 4 FELONY]", "Identity Theft - 5.2-01 [CLASS 3 FELONY]"])
    );
}

#[tokio::test]
async fn unmatched_term_is_empty() {
    let test = test_app();
    let (_, body) = send_json(&test.router, "GET", "/api/charges?q=jaywalking", None, None).await;
    assert_eq!(body, json!([]));
}
