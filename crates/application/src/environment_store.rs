//! Named environment bookkeeping and selection.

use indexmap::IndexMap;
use parking_lot::RwLock;

use beacon_domain::Environment;

use crate::ports::EnvironmentSource;

/// Owns the loaded environment set and the current selection.
///
/// The set is fixed after construction; only the selection moves.
/// Selection is last-write-wins and never affects executions already
/// holding an environment snapshot.
pub struct EnvironmentStore {
    environments: IndexMap<String, Environment>,
    current: RwLock<Option<String>>,
}

impl EnvironmentStore {
    /// Creates a store over an already-loaded environment set.
    #[must_use]
    pub fn new(environments: IndexMap<String, Environment>) -> Self {
        Self {
            environments,
            current: RwLock::new(None),
        }
    }

    /// Loads environments from a source, degrading to an empty set with
    /// a warning when the source is missing or malformed. Startup never
    /// fails on configuration problems.
    pub async fn load_or_default(source: &dyn EnvironmentSource) -> Self {
        match source.load().await {
            Ok(environments) => {
                tracing::info!(count = environments.len(), "environments loaded");
                Self::new(environments)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load environments, starting with none");
                Self::new(IndexMap::new())
            }
        }
    }

    /// The full name to configuration mapping, in declaration order.
    #[must_use]
    pub const fn environments(&self) -> &IndexMap<String, Environment> {
        &self.environments
    }

    /// A snapshot of one named environment.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Environment> {
        self.environments.get(name).cloned()
    }

    /// Selects the named environment for subsequent executions.
    ///
    /// Returns false and leaves the prior selection unchanged when the
    /// name is unknown.
    pub fn select(&self, name: &str) -> bool {
        if self.environments.contains_key(name) {
            *self.current.write() = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Name of the current selection, if any.
    #[must_use]
    pub fn selected_name(&self) -> Option<String> {
        self.current.read().clone()
    }

    /// A snapshot of the currently selected environment.
    #[must_use]
    pub fn selected(&self) -> Option<Environment> {
        self.current
            .read()
            .as_deref()
            .and_then(|name| self.get(name))
    }

    /// Resolves the environment a run should bind: the named one when
    /// given, otherwise the current selection. Unknown names and an
    /// empty selection resolve to the empty environment; a lookup miss
    /// is never an error, and tests missing required keys fail at their
    /// own assertion sites.
    #[must_use]
    pub fn resolve(&self, name: Option<&str>) -> Environment {
        match name {
            Some(name) => self.get(name).unwrap_or_else(|| {
                tracing::warn!(environment = name, "unknown environment, using empty configuration");
                Environment::new()
            }),
            None => self.selected().unwrap_or_default(),
        }
    }
}
