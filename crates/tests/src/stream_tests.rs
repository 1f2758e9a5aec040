use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

use crate::common::{sign_in, submit_case, test_app, APP};

/// Reads `snapshot` events off an SSE response body.
struct EventReader<S> {
    body: S,
    buf: String,
}

impl<S, E> EventReader<S>
where
    S: futures::Stream<Item = Result<axum::body::Bytes, E>> + Unpin,
    E: std::fmt::Debug,
{
    async fn next_snapshot(&mut self) -> Value {
        loop {
            if let Some(end) = self.buf.find("\n\n") {
                let frame: String = self.buf.drain(..end + 2).collect();
                let is_snapshot = frame.lines().any(|l| l == "event: snapshot");
                let data = frame.lines().find_map(|l| l.strip_prefix("data: "));
                if let (true, Some(data)) = (is_snapshot, data) {
                    return serde_json::from_str(data).unwrap();
                }
                continue;
            }
            let chunk = tokio::time::timeout(Duration::from_secs(5), self.body.next())
                .await
                .expect("timed out waiting for event")
                .expect("stream ended")
                .unwrap();
            self.buf.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }
}

async fn open_stream(
    router: &axum::Router,
    query: &str,
) -> (StatusCode, impl futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin) {
    let req = Request::builder()
        .uri(format!("/api/cases/stream?{query}"))
        .header("x-app-id", APP)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(req).await.unwrap();
    (response.status(), response.into_body().into_data_stream())
}

#[tokio::test]
async fn stream_requires_session() {
    let test = test_app();
    let (status, _) = open_stream(&test.router, "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stream_sends_initial_snapshot_then_updates() {
    let test = test_app();
    let token = sign_in(&test.router).await;
    submit_case(&test.router, &token, "John Doe", "Theft").await;

    let (status, body) = open_stream(&test.router, &format!("access_token={token}")).await;
    assert_eq!(status, StatusCode::OK);
    let mut events = EventReader { body, buf: String::new() };

    let first = events.next_snapshot().await;
    assert_eq!(first["cases"].as_array().unwrap().len(), 1);
    assert_eq!(first["counts"]["pending"], 1);

    submit_case(&test.router, &token, "Jane Roe", "Fraud").await;

    let second = events.next_snapshot().await;
    let cases = second["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0]["arrestedUser"], "Jane Roe");
}

#[tokio::test]
async fn stream_applies_filters_to_each_snapshot() {
    let test = test_app();
    let token = sign_in(&test.router).await;
    submit_case(&test.router, &token, "John Doe", "Theft").await;

    let (_, body) =
        open_stream(&test.router, &format!("access_token={token}&name=roe")).await;
    let mut events = EventReader { body, buf: String::new() };

    let first = events.next_snapshot().await;
    assert_eq!(first["cases"].as_array().unwrap().len(), 0);
    assert_eq!(first["counts"]["total"], 1);

    submit_case(&test.router, &token, "Jane Roe", "Fraud").await;

    let second = events.next_snapshot().await;
    assert_eq!(second["cases"].as_array().unwrap().len(), 1);
    assert_eq!(second["counts"]["total"], 2);
}
