//! Environment source port
//!
//! Defines the interface for loading named environment configurations.

use async_trait::async_trait;
use indexmap::IndexMap;

use beacon_domain::Environment;

/// Errors that can occur while loading environment configurations.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentSourceError {
    /// The configuration source does not exist.
    #[error("configuration not found: {0}")]
    NotFound(String),

    /// The source format is not recognized.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source exists but could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Port for loading named environment configurations.
///
/// The resulting mapping preserves the source's declaration order.
#[async_trait]
pub trait EnvironmentSource: Send + Sync {
    /// Loads the full environment-name to configuration mapping.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvironmentSourceError`] when the source is missing,
    /// unreadable or malformed. Callers wanting the harness's graceful
    /// degradation use
    /// [`EnvironmentStore::load_or_default`](crate::EnvironmentStore::load_or_default)
    /// instead of handling this themselves.
    async fn load(&self) -> Result<IndexMap<String, Environment>, EnvironmentSourceError>;
}
