//! Core type definitions for sheetsync.
//!
//! This crate defines the store-agnostic types shared by the storage layer,
//! the reconciliation engine and the CLI:
//! - [`Value`] — a dynamically typed cell mirroring SQLite storage classes
//! - [`Identity`] — a hashable, ordered primary-key value
//! - [`Row`] — a column-name-to-value mapping with canonical column names
//! - [`TableSchema`] — the declared columns of a target table
//!
//! Column names are compared case-insensitively everywhere. Both [`Row`] and
//! [`TableSchema`] normalize names through [`canonical_column`] at the
//! boundary, so downstream code only ever compares canonical names.

mod row;
mod schema;
mod value;

pub use row::{canonical_column, Row};
pub use schema::{ColumnDef, ColumnType, TableSchema};
pub use value::{Identity, Value};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type conversions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("expected a JSON object for a row, got {0}")]
    NotAnObject(String),
}
