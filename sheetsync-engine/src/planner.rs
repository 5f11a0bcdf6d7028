//! Reconciliation planning: which rows to delete, update and insert.

use crate::identity::KeyColumn;
use sheetsync_storage::{IdentitySource, StorageResult};
use sheetsync_types::{Identity, Row, TableSchema};
use std::collections::HashSet;
use tracing::{debug, info};

/// The operations that make a table match a batch.
///
/// Every incoming row lands in exactly one of `to_update` / `to_insert`.
/// `to_delete` only ever holds identities from the store snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationPlan {
    /// Persisted identities absent from the batch, sorted.
    pub to_delete: Vec<Identity>,
    /// Rows whose identity is already persisted.
    pub to_update: Vec<Row>,
    /// Rows whose identity is not persisted yet.
    pub to_insert: Vec<Row>,
}

impl ReconciliationPlan {
    /// True when applying the plan would issue no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_update.is_empty() && self.to_insert.is_empty()
    }
}

/// Reads the identity snapshot for the key column.
pub fn snapshot_identities(
    source: &impl IdentitySource,
    schema: &TableSchema,
    key: &KeyColumn,
) -> StorageResult<HashSet<Identity>> {
    let existing = source.fetch_column_values(schema, key.canonical())?;
    debug!("existing IDs: {:?}", existing);
    info!("existing IDs: {}", existing.len());
    Ok(existing)
}

/// Partitions a batch against the persisted identities.
///
/// Membership is decided by identity alone: a row identical to what is
/// stored still goes to `to_update`. Duplicate identities in the batch are
/// kept and land in the same bucket. An empty batch deletes everything.
pub fn plan(rows: Vec<Row>, existing: &HashSet<Identity>, key: &KeyColumn) -> ReconciliationPlan {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut to_update = Vec::new();
    let mut to_insert = Vec::new();

    for row in rows {
        match row.identity(key.canonical()) {
            Some(id) if existing.contains(&id) => {
                seen.insert(id);
                to_update.push(row);
            }
            Some(id) => {
                seen.insert(id);
                to_insert.push(row);
            }
            // a keyless row can never match a persisted one
            None => to_insert.push(row),
        }
    }
    debug!("sheet ids: {:?}", seen);
    info!("sheet ids: {}", seen.len());

    let mut to_delete: Vec<Identity> = existing.difference(&seen).cloned().collect();
    to_delete.sort();

    ReconciliationPlan {
        to_delete,
        to_update,
        to_insert,
    }
}
