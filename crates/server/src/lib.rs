//! Beacon Server - HTTP/SSE shell over the test engine
//!
//! A thin axum layer exposing the registry, environments and execution
//! sessions to a browser UI. Engine behavior lives entirely in the
//! application layer; handlers only translate between HTTP and it.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::api_router;
pub use state::AppState;

use std::net::SocketAddr;

/// Binds the listener and serves the API until the process ends.
///
/// # Errors
///
/// Returns bind or accept errors from the underlying listener.
pub async fn run_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = api_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "beacon api listening");
    axum::serve(listener, app).await
}
