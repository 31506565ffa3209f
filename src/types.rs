//! Crate-wide error and result types.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, HubError>;

/// Error type for all database and query operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// A referenced airport code does not exist.
    #[error("airport not found: {0}")]
    NotFound(String),
    /// An airport with this code already exists.
    #[error("airport code already exists: {0}")]
    DuplicateCode(String),
    /// The operation would break a structural invariant of the route tree.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// Underlying storage error. The enclosing transaction has been rolled
    /// back; no partial state is visible.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
