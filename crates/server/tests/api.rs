//! Integration tests for the UI-facing API.
//!
//! Each test drives the real router over an in-memory state, the same
//! way the browser shell does.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use beacon_application::{EnvironmentStore, SessionConfig, SessionManager};
use beacon_domain::{Environment, Registry, TestCase, TestFailure, ensure};
use beacon_server::{AppState, api_router};

fn test_router() -> Router {
    let registry = Arc::new(
        Registry::builder()
            .add(
                TestCase::new("ok", |env: Environment| async move {
                    ensure(env.base_url().is_some(), "missing baseUrl")
                })
                .in_group("Smoke"),
            )
            .add(TestCase::new("bad", |_env| async {
                Err(TestFailure::new("boom"))
            }))
            .add(TestCase::new("off", |_env| async { Ok(()) }).skipped())
            .build(),
    );

    let mut production = Environment::new();
    production.set("baseUrl", "http://example.invalid");
    let mut environments = IndexMap::new();
    environments.insert("Production".to_string(), production);

    let sessions = SessionManager::new(
        Arc::clone(&registry),
        SessionConfig {
            inter_test_delay: Duration::ZERO,
            ..SessionConfig::default()
        },
    );

    api_router(AppState::new(
        registry,
        Arc::new(EnvironmentStore::new(environments)),
        Arc::new(sessions),
    ))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_is_ok() {
    let router = test_router();
    let (status, body) = get(&router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lists_tests_with_group_and_skip_flag() {
    let router = test_router();
    let (status, body) = get(&router, "/api/tests").await;

    assert_eq!(status, StatusCode::OK);
    let tests = body.as_array().unwrap();
    assert_eq!(tests.len(), 3);
    assert_eq!(tests[0]["name"], "ok");
    assert_eq!(tests[0]["group"], "Smoke");
    assert_eq!(tests[0]["skipped"], false);
    assert_eq!(tests[2]["name"], "off");
    assert_eq!(tests[2]["skipped"], true);
}

#[tokio::test]
async fn lists_groups_in_creation_order() {
    let router = test_router();
    let (status, body) = get(&router, "/api/groups").await;

    assert_eq!(status, StatusCode::OK);
    let groups = body.as_array().unwrap();
    assert_eq!(groups[0]["name"], "Smoke");
    assert_eq!(groups[1]["name"], "Ungrouped");
    assert_eq!(groups[1]["tests"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn lists_environments_with_raw_configuration() {
    let router = test_router();
    let (status, body) = get(&router, "/api/environments").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Production"]["baseUrl"], "http://example.invalid");
}

#[tokio::test]
async fn selecting_environments_follows_the_store_contract() {
    let router = test_router();

    let (status, body) = post(
        &router,
        "/api/environments/select",
        json!({"name": "Production"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], true);

    let (status, body) = post(
        &router,
        "/api/environments/select",
        json!({"name": "Nowhere"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], false);
}

#[tokio::test]
async fn starting_a_session_reports_id_and_total() {
    let router = test_router();
    let (status, body) = post(
        &router,
        "/api/sessions",
        json!({"tests": [], "environment": "Production"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert!(!body["session_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn streaming_delivers_results_then_completed_then_expires() {
    let router = test_router();
    let (_, body) = post(
        &router,
        "/api/sessions",
        json!({"tests": [], "environment": "Production"}),
    )
    .await;
    let id = body["session_id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/sessions/{id}/stream"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#""type":"result""#));
    assert!(text.contains(r#""name":"ok""#));
    assert!(text.contains(r#""status":"failed""#));
    assert!(text.contains(r#""type":"completed""#));

    // The session is deleted once its stream completes.
    let (status, _) = get(&router, &format!("/api/sessions/{id}/summary")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_session_is_a_request_level_error() {
    let router = test_router();

    let (status, body) = get(&router, "/api/sessions/unknown/summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);

    let (status, _) = get(&router, "/api/sessions/unknown/stream").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cumulative_summary_counts_streamed_sessions() {
    let router = test_router();
    let (_, body) = post(&router, "/api/sessions", json!({"tests": ["ok"]})).await;
    let id = body["session_id"].as_str().unwrap().to_string();

    // Drain the stream so the session's single test completes.
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/sessions/{id}/stream"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let _ = response.into_body().collect().await.unwrap();

    let (status, body) = get(&router, "/api/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    // No environment bound: the test fails at its own check.
    assert_eq!(body["failed"], 1);
}
