//! Environment configuration bound at execution time.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-test timeout applied when the environment does not specify one.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A set of configuration values (base URL, timeout, ...) bound to test
/// executions. Keys keep their file order.
///
/// An empty environment is valid: tests that require specific keys fail
/// at their own assertion sites, never the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    values: IndexMap<String, Value>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns a string value for a key.
    #[must_use]
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Returns the target base URL, if configured.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.str_value("baseUrl")
    }

    /// Returns the per-test timeout, defaulting to 30 seconds.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        let secs = self
            .values
            .get("timeout")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Sets a configuration value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// True when no keys are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of configured keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over keys and raw values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<IndexMap<String, Value>> for Environment {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
