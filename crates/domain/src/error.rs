//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during registry lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced group has no registered tests.
    #[error("group '{0}' not found")]
    GroupNotFound(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
