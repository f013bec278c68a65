//! Error types for island generation

use thiserror::Error;

/// Errors that can occur during island generation or queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IslandError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The point set or bounding rectangle cannot be subdivided
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The graph broke one of its structural guarantees
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// Requested center ID does not exist
    #[error("center not found: {0}")]
    CenterNotFound(usize),
}

impl IslandError {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        IslandError::InvariantViolation(msg.into())
    }
}

/// Result type alias for island operations
pub type Result<T> = std::result::Result<T, IslandError>;
