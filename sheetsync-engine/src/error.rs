//! Error types for the reconciliation engine.

use sheetsync_storage::StorageError;
use std::fmt;
use thiserror::Error;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// The store interaction a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Schema,
    Snapshot,
    Begin,
    Delete,
    Update,
    Insert,
    Commit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Schema => "schema",
            Phase::Snapshot => "snapshot",
            Phase::Begin => "begin",
            Phase::Delete => "delete",
            Phase::Update => "update",
            Phase::Insert => "insert",
            Phase::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Errors that end a write. None of them leave partial effects behind.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The table declares columns the batch lacks and exact matching is on.
    #[error("incoming data have {count} unmatched columns {columns:?}")]
    SchemaMismatch { count: usize, columns: Vec<String> },

    /// The configured primary key is not a column of the table.
    #[error("invalid primary key {key} for table {table}")]
    InvalidPrimaryKey { key: String, table: String },

    /// A row carries no usable value for the primary key.
    #[error("row {row} has no value for primary key {column}")]
    MissingIdentity { row: usize, column: String },

    /// The store failed; the open transaction, if any, was rolled back.
    #[error("{phase} phase failed: {source}")]
    Store {
        phase: Phase,
        #[source]
        source: StorageError,
    },
}

impl WriteError {
    /// Only store failures can succeed on a retry of the whole write.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, WriteError::Store { .. })
    }

    /// Returns the failed phase for store errors.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            WriteError::Store { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    pub(crate) fn at(phase: Phase) -> impl FnOnce(StorageError) -> WriteError {
        move |source| WriteError::Store { phase, source }
    }
}
