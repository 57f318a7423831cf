//! Beacon API Test Harness binary.
//!
//! Wires the pieces together: tracing, environment configuration, the
//! sample registry and the HTTP/SSE server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use beacon_application::{EnvironmentStore, SessionConfig, SessionManager};
use beacon_domain::Registry;
use beacon_infrastructure::FileEnvironmentSource;
use beacon_infrastructure::suites::httpbin;
use beacon_server::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment
    let host = std::env::var("BEACON_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("BEACON_PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()?;
    let config_path = std::env::var("BEACON_CONFIG")
        .unwrap_or_else(|_| "configs/environments.json".to_string());
    let stream_delay = std::env::var("BEACON_STREAM_DELAY_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(500);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!(
        "Starting Beacon API Test Harness v{}",
        env!("CARGO_PKG_VERSION")
    );

    let registry = Arc::new(httpbin::register(Registry::builder()).build());
    tracing::info!(
        tests = registry.len(),
        groups = registry.groups().len(),
        "registry built"
    );

    let source = FileEnvironmentSource::new(&config_path);
    let environments = Arc::new(EnvironmentStore::load_or_default(&source).await);

    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&registry),
        SessionConfig {
            inter_test_delay: Duration::from_millis(stream_delay),
            ..SessionConfig::default()
        },
    ));

    beacon_server::run_server(addr, AppState::new(registry, environments, sessions)).await?;

    Ok(())
}
