//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (duplicate
/// identities, missing records). HTTP status mapping belongs to the API layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A record with the same identity already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A requested record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing store could not be accessed (e.g. poisoned lock).
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
