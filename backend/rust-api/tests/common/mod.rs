#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use gauntlet_api::store::{MemorySubmissionStore, SubmissionStore};
use gauntlet_api::{config::Config, create_router, AppState};

/// Router plus a handle on the in-memory submission log so tests can
/// inspect appended rows and inject store failures.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemorySubmissionStore>,
}

pub async fn create_test_app() -> TestApp {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config::load().expect("Failed to load test configuration");

    let store = Arc::new(MemorySubmissionStore::new());
    let app_state = Arc::new(AppState::new(
        config,
        store.clone() as Arc<dyn SubmissionStore>,
    ));

    TestApp {
        router: create_router(app_state),
        store,
    }
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a session for `team_id` and return its id.
pub async fn create_session(app: &Router, team_id: &str) -> String {
    let (status, json) = post_json(
        app,
        "/api/v1/sessions",
        serde_json::json!({ "team_id": team_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["session_id"].as_str().unwrap().to_string()
}

/// Submit one answer and return the (status, body) pair.
pub async fn submit(
    app: &Router,
    session_id: &str,
    problem_id: &str,
    answer: &str,
) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        &format!("/api/v1/sessions/{}/problems/{}/answers", session_id, problem_id),
        serde_json::json!({ "answer": answer }),
    )
    .await
}
