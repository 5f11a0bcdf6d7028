use crate::canonical_column;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Describes a target table: its name and declared columns.
///
/// Fetched from the store at the start of every write and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

/// A declared column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Name as declared on the table.
    pub name: String,
    /// Raw declared type (e.g., "VARCHAR(40)").
    pub declared_type: String,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub primary_key: bool,
}

impl ColumnDef {
    /// Creates a nullable, non-key column from its declared type.
    pub fn new(name: &str, declared_type: &str) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            column_type: ColumnType::from_declared(declared_type),
            not_null: false,
            primary_key: false,
        }
    }

    /// Canonical (lower-cased) name.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        canonical_column(&self.name)
    }
}

/// Column type affinity.
///
/// Derived from the declared type with SQLite's affinity rules, checked in
/// order: INT, then CHAR/CLOB/TEXT, then BLOB or no type, then REAL/FLOA/DOUB,
/// otherwise NUMERIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

impl ColumnType {
    #[must_use]
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_uppercase();
        if upper.contains("INT") {
            ColumnType::Integer
        } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| upper.contains(t)) {
            ColumnType::Text
        } else if upper.contains("BLOB") || upper.trim().is_empty() {
            ColumnType::Blob
        } else if ["REAL", "FLOA", "DOUB"].iter().any(|t| upper.contains(t)) {
            ColumnType::Real
        } else {
            ColumnType::Numeric
        }
    }
}

impl TableSchema {
    pub fn new(name: &str, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Looks up a column by name, case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        let wanted = canonical_column(name);
        self.columns.iter().find(|c| c.canonical_name() == wanted)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Canonical names of every declared column.
    #[must_use]
    pub fn canonical_names(&self) -> BTreeSet<String> {
        self.columns.iter().map(ColumnDef::canonical_name).collect()
    }

    /// Declared name for a column, falling back to the given name when the
    /// table does not declare it.
    #[must_use]
    pub fn declared_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.column(name).map_or(name, |c| c.name.as_str())
    }
}
