//! File-based environment source.
//!
//! Environments live in a single JSON or YAML file mapping environment
//! names to their configuration values:
//!
//! ```json
//! {
//!   "Production": { "baseUrl": "https://httpbin.org", "timeout": 30 },
//!   "Staging":    { "baseUrl": "https://staging.httpbin.org", "timeout": 10 }
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;

use beacon_application::ports::{EnvironmentSource, EnvironmentSourceError};
use beacon_domain::Environment;

/// Loads environments from a JSON or YAML file, chosen by extension.
#[derive(Debug, Clone)]
pub struct FileEnvironmentSource {
    path: PathBuf,
}

enum Format {
    Json,
    Yaml,
}

impl FileEnvironmentSource {
    /// Creates a source reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format, EnvironmentSourceError> {
        let extension = self
            .path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yml" | "yaml") => Ok(Format::Yaml),
            Some(other) => Err(EnvironmentSourceError::UnsupportedFormat(other.to_string())),
            None => Err(EnvironmentSourceError::UnsupportedFormat(
                self.path.display().to_string(),
            )),
        }
    }
}

#[async_trait]
impl EnvironmentSource for FileEnvironmentSource {
    async fn load(&self) -> Result<IndexMap<String, Environment>, EnvironmentSourceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(EnvironmentSourceError::NotFound(
                    self.path.display().to_string(),
                ));
            }
            Err(error) => return Err(EnvironmentSourceError::Io(error)),
        };

        let environments = match self.format()? {
            Format::Json => serde_json::from_slice(&bytes)
                .map_err(|error| EnvironmentSourceError::Parse(error.to_string()))?,
            Format::Yaml => serde_yaml::from_slice(&bytes)
                .map_err(|error| EnvironmentSourceError::Parse(error.to_string()))?,
        };

        tracing::debug!(path = %self.path.display(), "environment file parsed");
        Ok(environments)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use beacon_application::EnvironmentStore;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("write test fixture");
        path
    }

    #[tokio::test]
    async fn loads_json_environments_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "environments.json",
            r#"{
                "Production": {"baseUrl": "https://httpbin.org", "timeout": 30},
                "Staging": {"baseUrl": "https://staging.httpbin.org"}
            }"#,
        );

        let environments = FileEnvironmentSource::new(path).load().await.unwrap();
        let names: Vec<&str> = environments.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Production", "Staging"]);
        assert_eq!(
            environments["Production"].base_url(),
            Some("https://httpbin.org")
        );
        assert_eq!(environments["Staging"].timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn yaml_parses_to_the_same_shape_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let json = write_file(
            &dir,
            "env.json",
            r#"{"Dev": {"baseUrl": "http://localhost:8080", "timeout": 5}}"#,
        );
        let yaml = write_file(
            &dir,
            "env.yaml",
            "Dev:\n  baseUrl: http://localhost:8080\n  timeout: 5\n",
        );

        let from_json = FileEnvironmentSource::new(json).load().await.unwrap();
        let from_yaml = FileEnvironmentSource::new(yaml).load().await.unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileEnvironmentSource::new(dir.path().join("absent.json"));
        assert!(matches!(
            source.load().await,
            Err(EnvironmentSourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "environments.toml", "x = 1");
        assert!(matches!(
            FileEnvironmentSource::new(path).load().await,
            Err(EnvironmentSourceError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn malformed_content_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "environments.json", "{not json");
        assert!(matches!(
            FileEnvironmentSource::new(path).load().await,
            Err(EnvironmentSourceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn store_degrades_to_empty_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileEnvironmentSource::new(dir.path().join("absent.json"));
        let store = EnvironmentStore::load_or_default(&source).await;
        assert!(store.environments().is_empty());
        assert!(store.resolve(Some("Production")).is_empty());
    }
}
