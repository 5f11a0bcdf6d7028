//! Table store layer for sheetsync.
//!
//! Defines the collaborator contract the reconciliation engine writes
//! through, and a SQLite implementation of it.
//!
//! # Architecture
//!
//! - [`TableStore`] reads a table's schema and opens transactions
//! - [`TableTransaction`] runs the delete/update/insert statements of one
//!   write and either commits them or rolls them back
//! - [`IdentitySource`] reads the identity snapshot; both the store and an
//!   open transaction implement it, so the snapshot can be taken inside or
//!   outside the write transaction
//!
//! Dropping a transaction without committing rolls it back.

mod error;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use sqlite::{quote_ident, SqliteStore, SqliteTransaction};

use sheetsync_types::{Identity, Row, TableSchema};
use std::collections::HashSet;

/// How a transaction acquires its locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeginMode {
    /// Locks are taken lazily by the first statement that needs them.
    #[default]
    Deferred,
    /// The write lock is taken when the transaction begins.
    Immediate,
}

/// Reads the distinct identity values persisted in one column.
pub trait IdentitySource {
    /// Returns every non-null, non-empty value of `column` in the table.
    fn fetch_column_values(
        &self,
        schema: &TableSchema,
        column: &str,
    ) -> StorageResult<HashSet<Identity>>;
}

/// A relational store holding the target tables.
pub trait TableStore: IdentitySource {
    type Transaction<'a>: TableTransaction
    where
        Self: 'a;

    /// Reads the declared columns of a table.
    fn fetch_table_schema(&self, table: &str) -> StorageResult<TableSchema>;

    /// Opens a transaction. The store stays borrowed until it ends.
    fn begin(&mut self, mode: BeginMode) -> StorageResult<Self::Transaction<'_>>;
}

/// An open write transaction against a [`TableStore`].
///
/// Each method returns the number of rows the store reports as affected.
pub trait TableTransaction: IdentitySource {
    /// Deletes the rows whose `column` value is one of `keys`.
    fn delete_keys(
        &mut self,
        schema: &TableSchema,
        column: &str,
        keys: &[Identity],
    ) -> StorageResult<usize>;

    /// Deletes every row of the table.
    fn delete_all(&mut self, schema: &TableSchema) -> StorageResult<usize>;

    /// Updates rows matched by `column`, setting every column each row carries.
    fn update_rows(&mut self, schema: &TableSchema, column: &str, rows: &[Row])
    -> StorageResult<usize>;

    /// Inserts rows, setting the columns each row carries.
    fn insert_rows(&mut self, schema: &TableSchema, rows: &[Row]) -> StorageResult<usize>;

    fn commit(self) -> StorageResult<()>;

    fn rollback(self) -> StorageResult<()>;
}

impl<T: IdentitySource + ?Sized> IdentitySource for &mut T {
    fn fetch_column_values(
        &self,
        schema: &TableSchema,
        column: &str,
    ) -> StorageResult<HashSet<Identity>> {
        (**self).fetch_column_values(schema, column)
    }
}

impl<T: TableStore> TableStore for &mut T {
    type Transaction<'a>
        = T::Transaction<'a>
    where
        Self: 'a;

    fn fetch_table_schema(&self, table: &str) -> StorageResult<TableSchema> {
        (**self).fetch_table_schema(table)
    }

    fn begin(&mut self, mode: BeginMode) -> StorageResult<Self::Transaction<'_>> {
        (**self).begin(mode)
    }
}
