//! HTTP router composition for the UI-facing API.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    cancel_session, cumulative_summary, health, list_environments, list_groups, list_tests,
    select_environment, session_summary, start_session, stream_session,
};
use crate::state::AppState;

/// Builds the API router over the shared state.
#[must_use]
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/tests", get(list_tests))
        .route("/api/groups", get(list_groups))
        .route("/api/environments", get(list_environments))
        .route("/api/environments/select", post(select_environment))
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/{id}/stream", get(stream_session))
        .route("/api/sessions/{id}/summary", get(session_summary))
        .route("/api/sessions/{id}", delete(cancel_session))
        .route("/api/summary", get(cumulative_summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
