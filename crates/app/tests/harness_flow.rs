//! End-to-end harness flow.
//!
//! Exercises the complete path the binary wires together: environment
//! file -> store -> session manager -> streamed results, without going
//! through HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use beacon_application::{EnvironmentStore, SessionConfig, SessionEvent, SessionManager};
use beacon_domain::{Environment, Registry, TestCase, TestStatus, ensure};
use beacon_infrastructure::FileEnvironmentSource;

fn registry() -> Arc<Registry> {
    Arc::new(
        Registry::builder()
            .add(
                TestCase::new("reads baseUrl", |env: Environment| async move {
                    ensure(
                        env.base_url() == Some("http://localhost:3000"),
                        "wrong baseUrl",
                    )
                })
                .in_group("Environment"),
            )
            .add(
                TestCase::new("reads timeout", |env: Environment| async move {
                    ensure(env.timeout() == Duration::from_secs(5), "wrong timeout")
                })
                .in_group("Environment"),
            )
            .add(TestCase::new("left out", |_env| async { Ok(()) }))
            .build(),
    )
}

#[tokio::test]
async fn full_flow_from_config_file_to_streamed_results() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let config = dir.path().join("environments.json");
    std::fs::write(
        &config,
        r#"{"Development": {"baseUrl": "http://localhost:3000", "timeout": 5}}"#,
    )
    .expect("write environments file");

    // Load environments the way the binary does.
    let source = FileEnvironmentSource::new(&config);
    let store = EnvironmentStore::load_or_default(&source).await;
    assert!(store.select("Development"));

    // Start a session over a subset, bound to the selected environment.
    let registry = registry();
    let manager = SessionManager::new(
        Arc::clone(&registry),
        SessionConfig {
            inter_test_delay: Duration::ZERO,
            ..SessionConfig::default()
        },
    );
    let info = manager.start(
        &["reads baseUrl".to_string(), "reads timeout".to_string()],
        store.resolve(None),
    );
    assert_eq!(info.total, 2);

    // Drain the stream: two passing results, then the completed marker.
    let mut stream = manager.take_stream(&info.session_id).unwrap();
    let mut statuses = Vec::new();
    while let Some(event) = stream.recv().await {
        match event {
            SessionEvent::Result { result, .. } => statuses.push(result.status),
            SessionEvent::Completed { summary } => {
                assert_eq!(summary.total, 2);
                assert_eq!(summary.passed, 2);
            }
        }
    }
    assert_eq!(statuses, vec![TestStatus::Passed, TestStatus::Passed]);

    // The cumulative log saw both results.
    let cumulative = manager.cumulative_summary();
    assert_eq!(cumulative.total, 2);
    assert!(cumulative.all_passed());
}

#[tokio::test]
async fn missing_config_degrades_and_sessions_still_run() {
    let source = FileEnvironmentSource::new("/nonexistent/environments.json");
    let store = EnvironmentStore::load_or_default(&source).await;
    assert!(store.environments().is_empty());

    let manager = SessionManager::new(
        registry(),
        SessionConfig {
            inter_test_delay: Duration::ZERO,
            ..SessionConfig::default()
        },
    );
    // Unknown environment name resolves to empty configuration.
    let info = manager.start(&["left out".to_string()], store.resolve(Some("Production")));
    let mut stream = manager.take_stream(&info.session_id).unwrap();

    let first = stream.recv().await.unwrap();
    match first {
        SessionEvent::Result { result, .. } => assert_eq!(result.status, TestStatus::Passed),
        SessionEvent::Completed { .. } => panic!("expected a result before completion"),
    }
}
