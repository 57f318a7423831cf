//! Request handlers for the UI-facing API.

use std::convert::Infallible;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use beacon_application::{SessionEvent, SessionInfo};
use beacon_domain::{Environment, RunSummary};

use crate::error::ApiResult;
use crate::state::AppState;

/// Row describing one registered test.
#[derive(Debug, Serialize)]
pub struct TestView {
    /// Registered test name.
    pub name: String,
    /// Group label.
    pub group: String,
    /// Whether executions short-circuit to `skipped`.
    pub skipped: bool,
}

/// A group with its ordered tests.
#[derive(Debug, Serialize)]
pub struct GroupView {
    /// Group name.
    pub name: String,
    /// Tests in registration order.
    pub tests: Vec<TestView>,
}

/// Request body for environment selection.
#[derive(Debug, Deserialize)]
pub struct SelectEnvironmentRequest {
    /// Environment name to select.
    pub name: String,
}

/// Outcome of an environment selection attempt.
#[derive(Debug, Serialize)]
pub struct SelectEnvironmentResponse {
    /// False when the name is unknown; the prior selection then stands.
    pub selected: bool,
}

/// Request body for starting a session.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartSessionRequest {
    /// Test names to run; empty means every registered test.
    pub tests: Vec<String>,
    /// Environment name to bind; unset uses the current selection.
    pub environment: Option<String>,
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Enumerates every registered test.
pub async fn list_tests(State(state): State<AppState>) -> Json<Vec<TestView>> {
    let tests = state
        .registry
        .tests()
        .iter()
        .map(|case| TestView {
            name: case.name().to_string(),
            group: case.group().to_string(),
            skipped: case.is_skipped(),
        })
        .collect();
    Json(tests)
}

/// Enumerates groups with their ordered test lists.
pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<GroupView>> {
    let groups = state
        .registry
        .groups()
        .iter()
        .map(|(name, cases)| GroupView {
            name: name.clone(),
            tests: cases
                .iter()
                .map(|case| TestView {
                    name: case.name().to_string(),
                    group: case.group().to_string(),
                    skipped: case.is_skipped(),
                })
                .collect(),
        })
        .collect();
    Json(groups)
}

/// Enumerates environment names with their raw configuration.
pub async fn list_environments(
    State(state): State<AppState>,
) -> Json<IndexMap<String, Environment>> {
    Json(state.environments.environments().clone())
}

/// Selects the active environment; unknown names leave the prior
/// selection unchanged.
pub async fn select_environment(
    State(state): State<AppState>,
    Json(request): Json<SelectEnvironmentRequest>,
) -> Json<SelectEnvironmentResponse> {
    let selected = state.environments.select(&request.name);
    Json(SelectEnvironmentResponse { selected })
}

/// Starts a session over the chosen tests and environment.
pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Json<SessionInfo> {
    let environment = state.environments.resolve(request.environment.as_deref());
    let info = state.sessions.start(&request.tests, environment);
    Json(info)
}

/// Streams a session's per-test results as server-sent events, ending
/// with a terminal `completed` record. The session is deleted once the
/// stream ends.
pub async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let mut events = state.sessions.take_stream(&id)?;

    let stream = async_stream::stream! {
        while let Some(event) = events.recv().await {
            let data = serde_json::to_string(&event).unwrap_or_default();
            let done = matches!(event, SessionEvent::Completed { .. });
            yield Ok(Event::default().data(data));
            if done {
                break;
            }
        }
        state.sessions.finish(&id);
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Aggregate summary of one live session.
pub async fn session_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RunSummary>> {
    Ok(Json(state.sessions.summary(&id)?))
}

/// Cancels a session between tests and deletes it.
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.sessions.cancel(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Aggregate summary over everything any session has run.
pub async fn cumulative_summary(State(state): State<AppState>) -> Json<RunSummary> {
    Json(state.sessions.cumulative_summary())
}
