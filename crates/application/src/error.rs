//! Application error types

use thiserror::Error;
use beacon_domain::DomainError;

use crate::ports::EnvironmentSourceError;

/// Application-level errors.
///
/// Failures inside a single test execution never surface here; they are
/// contained in that test's result. Only structural errors (unknown
/// group, session or environment, unusable configuration) reach callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The referenced group, session or environment does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The environment configuration source is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<DomainError> for ApplicationError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::GroupNotFound(name) => Self::NotFound(format!("group '{name}'")),
        }
    }
}

impl From<EnvironmentSourceError> for ApplicationError {
    fn from(error: EnvironmentSourceError) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
