//! Error taxonomy for the memory graph.
//!
//! [`GraphError::NotFound`] and [`GraphError::Validation`] are caller
//! precondition violations and are never retried internally. Everything that
//! comes out of SQLite, JSON (de)serialization, or the filesystem is a
//! persistence failure.

use thiserror::Error;

/// Errors that can occur in the memory graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A referenced node id does not exist.
    #[error("node not found: {0}")]
    NotFound(String),

    /// Malformed input: missing edge endpoint, unknown enum value, out-of-range importance.
    #[error("validation error: {0}")]
    Validation(String),

    /// Persistence failure that did not originate from a typed source.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// SQLite error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// `true` for I/O, SQLite, and serialization failures.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::Database(_) | Self::Json(_) | Self::Io(_)
        )
    }
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
