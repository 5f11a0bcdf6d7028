//! Primary-key resolution.

use crate::error::{WriteError, WriteResult};
use sheetsync_types::{Row, TableSchema};

/// A primary-key column confirmed to exist on the target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumn {
    canonical: String,
    declared: String,
}

impl KeyColumn {
    /// Lower-cased name, used to read the key out of rows.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Name as declared on the table.
    pub fn declared(&self) -> &str {
        &self.declared
    }
}

/// Resolves the configured key against the table's columns.
///
/// Returns `None` when no key is configured, which selects the full-replace
/// strategy.
pub fn resolve_key(schema: &TableSchema, configured: Option<&str>) -> WriteResult<Option<KeyColumn>> {
    let Some(key) = configured.map(str::trim).filter(|k| !k.is_empty()) else {
        return Ok(None);
    };
    let column = schema
        .column(key)
        .ok_or_else(|| WriteError::InvalidPrimaryKey {
            key: key.to_string(),
            table: schema.name.clone(),
        })?;
    Ok(Some(KeyColumn {
        canonical: column.canonical_name(),
        declared: column.name.clone(),
    }))
}

/// Fails on the first row without a usable identity (absent, null or empty).
pub fn ensure_identities(rows: &[Row], key: &KeyColumn) -> WriteResult<()> {
    match rows.iter().position(|row| row.identity(key.canonical()).is_none()) {
        Some(row) => Err(WriteError::MissingIdentity {
            row,
            column: key.declared().to_string(),
        }),
        None => Ok(()),
    }
}
