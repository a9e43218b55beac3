//! Error types for the storage layer.

use thiserror::Error;

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write collided with existing state, e.g. a duplicate id or a
    /// completion that lost a race.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The write would break a store invariant, e.g. reviving a finished
    /// instance or opening a second pending task.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The caller handed the store an inconsistent write-set.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend itself failed (connection, lock, database).
    #[error("backend error: {0}")]
    Backend(String),
}
