//! Shared handler state.

use std::sync::Arc;

use beacon_application::{EnvironmentStore, SessionManager};
use beacon_domain::Registry;

/// State shared by every handler.
///
/// The registry is read-only after startup; the stores carry their own
/// interior locking, so cloning the state is cheap and lock-free.
#[derive(Clone)]
pub struct AppState {
    /// Immutable test and group definitions.
    pub registry: Arc<Registry>,
    /// Loaded environments and the current selection.
    pub environments: Arc<EnvironmentStore>,
    /// Live execution sessions.
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Bundles the shared components.
    #[must_use]
    pub const fn new(
        registry: Arc<Registry>,
        environments: Arc<EnvironmentStore>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            registry,
            environments,
            sessions,
        }
    }
}
