//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The target table does not exist (or declares no columns).
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
