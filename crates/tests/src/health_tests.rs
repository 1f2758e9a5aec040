use axum::http::StatusCode;

use crate::common::{send_json, test_app};

#[tokio::test]
async fn health_reports_memory_backend() {
    let test = test_app();
    let (status, body) = send_json(&test.router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "connected");
    assert_eq!(body["backend"], "memory");
}
