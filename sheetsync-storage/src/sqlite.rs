//! SQLite backend for [`TableStore`].

use crate::{
    BeginMode, IdentitySource, StorageError, StorageResult, TableStore, TableTransaction,
};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OpenFlags, TransactionBehavior};
use sheetsync_types::{ColumnDef, ColumnType, Identity, Row, TableSchema, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Keys bound per `DELETE ... IN (...)` statement. Stays well below
/// SQLite's default host parameter limit.
const DELETE_CHUNK: usize = 500;

/// Quotes an SQL identifier, doubling embedded quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A caller-owned SQLite connection used as a table store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Opens a database file that must already exist.
    pub fn open_existing(path: impl AsRef<Path>) -> StorageResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        Ok(Self { conn })
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl IdentitySource for SqliteStore {
    fn fetch_column_values(
        &self,
        schema: &TableSchema,
        column: &str,
    ) -> StorageResult<HashSet<Identity>> {
        read_column_values(&self.conn, schema, column)
    }
}

impl TableStore for SqliteStore {
    type Transaction<'a> = SqliteTransaction<'a>;

    fn fetch_table_schema(&self, table: &str) -> StorageResult<TableSchema> {
        read_schema(&self.conn, table)
    }

    fn begin(&mut self, mode: BeginMode) -> StorageResult<SqliteTransaction<'_>> {
        let behavior = match mode {
            BeginMode::Deferred => TransactionBehavior::Deferred,
            BeginMode::Immediate => TransactionBehavior::Immediate,
        };
        let tx = self.conn.transaction_with_behavior(behavior)?;
        Ok(SqliteTransaction { tx })
    }
}

/// An open SQLite transaction. Rolls back when dropped uncommitted.
pub struct SqliteTransaction<'a> {
    tx: rusqlite::Transaction<'a>,
}

impl IdentitySource for SqliteTransaction<'_> {
    fn fetch_column_values(
        &self,
        schema: &TableSchema,
        column: &str,
    ) -> StorageResult<HashSet<Identity>> {
        read_column_values(&self.tx, schema, column)
    }
}

impl TableTransaction for SqliteTransaction<'_> {
    fn delete_keys(
        &mut self,
        schema: &TableSchema,
        column: &str,
        keys: &[Identity],
    ) -> StorageResult<usize> {
        let table = quote_ident(&schema.name);
        let column = quote_ident(schema.declared_name(column));
        let mut deleted = 0;
        for chunk in keys.chunks(DELETE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("DELETE FROM {table} WHERE {column} IN ({placeholders})");
            let mut stmt = self.tx.prepare_cached(&sql)?;
            deleted += stmt.execute(params_from_iter(
                chunk.iter().map(|id| to_sql(&id.to_value())),
            ))?;
        }
        Ok(deleted)
    }

    fn delete_all(&mut self, schema: &TableSchema) -> StorageResult<usize> {
        let sql = format!("DELETE FROM {}", quote_ident(&schema.name));
        Ok(self.tx.execute(&sql, [])?)
    }

    fn update_rows(
        &mut self,
        schema: &TableSchema,
        column: &str,
        rows: &[Row],
    ) -> StorageResult<usize> {
        let table = quote_ident(&schema.name);
        let key = quote_ident(schema.declared_name(column));
        let mut updated = 0;
        for row in rows {
            let key_value = row.get(column).cloned().ok_or_else(|| {
                StorageError::InvalidData(format!("row has no value for key column {column}"))
            })?;
            let assignments: Vec<String> = row
                .columns()
                .enumerate()
                .map(|(i, name)| format!("{} = ?{}", quote_ident(schema.declared_name(name)), i + 1))
                .collect();
            let sql = format!(
                "UPDATE {table} SET {} WHERE {key} = ?{}",
                assignments.join(", "),
                row.len() + 1
            );
            let mut stmt = self.tx.prepare_cached(&sql)?;
            let values = row
                .iter()
                .map(|(_, v)| to_sql(v))
                .chain(std::iter::once(to_sql(&key_value)));
            updated += stmt.execute(params_from_iter(values))?;
        }
        Ok(updated)
    }

    fn insert_rows(&mut self, schema: &TableSchema, rows: &[Row]) -> StorageResult<usize> {
        let table = quote_ident(&schema.name);
        let mut inserted = 0;
        for row in rows {
            let sql = if row.is_empty() {
                format!("INSERT INTO {table} DEFAULT VALUES")
            } else {
                let columns: Vec<String> = row
                    .columns()
                    .map(|name| quote_ident(schema.declared_name(name)))
                    .collect();
                let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{i}")).collect();
                format!(
                    "INSERT INTO {table} ({}) VALUES ({})",
                    columns.join(", "),
                    placeholders.join(", ")
                )
            };
            let mut stmt = self.tx.prepare_cached(&sql)?;
            inserted += stmt.execute(params_from_iter(row.iter().map(|(_, v)| to_sql(v))))?;
        }
        Ok(inserted)
    }

    fn commit(self) -> StorageResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> StorageResult<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

fn read_schema(conn: &Connection, table: &str) -> StorageResult<TableSchema> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
    )?;
    let columns = stmt
        .query_map([table], |row| {
            let name: String = row.get(0)?;
            let declared_type: String = row.get(1)?;
            let not_null: i64 = row.get(2)?;
            let pk: i64 = row.get(3)?;
            Ok(ColumnDef {
                column_type: ColumnType::from_declared(&declared_type),
                name,
                declared_type,
                not_null: not_null != 0,
                primary_key: pk != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(StorageError::TableNotFound(table.to_string()));
    }
    debug!("table {} has {} columns", table, columns.len());
    Ok(TableSchema::new(table, columns))
}

fn read_column_values(
    conn: &Connection,
    schema: &TableSchema,
    column: &str,
) -> StorageResult<HashSet<Identity>> {
    let sql = format!(
        "SELECT {} FROM {}",
        quote_ident(schema.declared_name(column)),
        quote_ident(&schema.name)
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut ids = HashSet::new();
    while let Some(row) = rows.next()? {
        let value: SqlValue = row.get(0)?;
        if let Some(id) = from_sql(value).to_identity() {
            ids.insert(id);
        }
    }
    Ok(ids)
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Integer(i),
        SqlValue::Real(f) => Value::Real(f),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Blob(b),
    }
}
