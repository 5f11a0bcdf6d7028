//! Schema validation of an incoming batch against the target table.
//!
//! Only one direction is checked: columns the table declares but the batch
//! lacks. Tables may evolve ahead of the sheets feeding them, so under a
//! relaxed policy those columns are simply never written. Columns the batch
//! carries but the table does not declare are left for the store to reject.

use crate::error::{WriteError, WriteResult};
use sheetsync_types::{Row, TableSchema};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Checks the batch's columns against the table's declared columns.
///
/// The first row stands in for the whole batch; batches are assumed to be
/// shape-homogeneous. An empty batch always passes.
pub fn validate_columns(rows: &[Row], schema: &TableSchema, exact_match: bool) -> WriteResult<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let in_batch: BTreeSet<String> = first.columns().map(str::to_string).collect();
    let in_table = schema.canonical_names();
    debug!("table has {} columns", in_table.len());
    debug!("data has {} columns", in_batch.len());

    let undeclared: Vec<&String> = in_batch.difference(&in_table).collect();
    if !undeclared.is_empty() {
        debug!(
            "data has {} columns not declared on {}: {:?}",
            undeclared.len(),
            schema.name,
            undeclared
        );
    }

    let missing: Vec<String> = in_table.difference(&in_batch).cloned().collect();
    if missing.is_empty() {
        return Ok(());
    }
    if exact_match {
        return Err(WriteError::SchemaMismatch {
            count: missing.len(),
            columns: missing,
        });
    }
    warn!(
        "table {} has {} columns missing from the data, leaving them unset: {:?}",
        schema.name,
        missing.len(),
        missing
    );
    Ok(())
}
