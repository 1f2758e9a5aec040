use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use server::db::AppState;
use server::identity::IdentityProvider;
use server::notify::NoopSink;
use server::store::MemoryStore;
use server::summarize::SummarizationClient;

pub const TEST_SECRET: &str = "integration-test-session-secret";
pub const APP: &str = "precinct-9";
pub const OTHER_APP: &str = "precinct-12";

/// Router over a fresh in-memory store. The store handle is returned so
/// tests can seed or inspect it directly.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub identity: IdentityProvider,
}

pub fn test_app() -> TestApp {
    build(None)
}

pub fn test_app_with_summarizer(client: SummarizationClient) -> TestApp {
    build(Some(client))
}

fn build(summarizer: Option<SummarizationClient>) -> TestApp {
    let store = MemoryStore::new();
    let identity = IdentityProvider::new(TEST_SECRET, Duration::hours(1));
    let state = AppState::new(
        Arc::new(store.clone()),
        identity.clone(),
        Arc::new(NoopSink),
        summarizer,
    );
    TestApp {
        router: server::openapi::api_router(state, false),
        store,
        identity,
    }
}

/// Sign in anonymously and return the bearer token.
pub async fn sign_in(app: &Router) -> String {
    let (status, body) = send_json(app, "POST", "/api/session", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    body["accessToken"].as_str().unwrap().to_string()
}

/// Sign in as a named actor via a bootstrap token.
pub async fn sign_in_as(test: &TestApp, actor_id: &str) -> String {
    let bootstrap = test
        .identity
        .issue_bootstrap(actor_id, Duration::minutes(5))
        .unwrap();
    let (status, body) = send_json(
        &test.router,
        "POST",
        "/api/session",
        None,
        Some(json!({ "token": bootstrap })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actorId"], actor_id);
    body["accessToken"].as_str().unwrap().to_string()
}

/// Submit a minimal valid arrest under `APP` and return the created record.
pub async fn submit_case(app: &Router, token: &str, arrested_user: &str, reason: &str) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/cases",
        Some(token),
        Some(json!({ "arrestedUser": arrested_user, "reason": reason })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "submit failed: {body}");
    body
}

/// Send a request scoped to `APP`.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_for_app(app, APP, method, uri, token, body).await
}

/// Send a request with an explicit `X-App-Id`.
pub async fn send_for_app(
    app: &Router,
    app_id: &str,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-app-id", app_id);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, body)
}
