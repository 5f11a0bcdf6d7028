//! Applies plans inside a store transaction.
//!
//! The caller owns the transaction: these functions only issue statements
//! and never commit. Any error leaves the transaction to be rolled back.

use crate::error::{Phase, WriteError, WriteResult};
use crate::identity::KeyColumn;
use crate::planner::ReconciliationPlan;
use sheetsync_storage::TableTransaction;
use sheetsync_types::{Row, TableSchema};
use tracing::{debug, info};

/// What a successful write did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The batch was empty; the store was not touched.
    NoOp,
    /// No key configured: the table was emptied and refilled.
    Replaced { deleted: usize, inserted: usize },
    /// Rows were matched by key.
    Reconciled {
        deleted: usize,
        updated: usize,
        inserted: usize,
    },
}

/// Runs delete, update, then insert. Empty phases are skipped.
pub fn apply_plan<T: TableTransaction>(
    tx: &mut T,
    plan: &ReconciliationPlan,
    schema: &TableSchema,
    key: &KeyColumn,
) -> WriteResult<WriteOutcome> {
    let mut deleted = 0;
    if !plan.to_delete.is_empty() {
        info!("deleting {} rows", plan.to_delete.len());
        debug!("deleting {:?}", plan.to_delete);
        deleted = tx
            .delete_keys(schema, key.canonical(), &plan.to_delete)
            .map_err(WriteError::at(Phase::Delete))?;
    }

    let mut updated = 0;
    if !plan.to_update.is_empty() {
        info!("updating {} rows", plan.to_update.len());
        updated = tx
            .update_rows(schema, key.canonical(), &plan.to_update)
            .map_err(WriteError::at(Phase::Update))?;
    }

    let mut inserted = 0;
    if !plan.to_insert.is_empty() {
        info!("inserting {} rows", plan.to_insert.len());
        inserted = tx
            .insert_rows(schema, &plan.to_insert)
            .map_err(WriteError::at(Phase::Insert))?;
    }

    Ok(WriteOutcome::Reconciled {
        deleted,
        updated,
        inserted,
    })
}

/// Deletes every row of the table, then inserts the batch.
pub fn apply_full_replace<T: TableTransaction>(
    tx: &mut T,
    rows: &[Row],
    schema: &TableSchema,
) -> WriteResult<WriteOutcome> {
    info!("deleting all rows");
    let deleted = tx.delete_all(schema).map_err(WriteError::at(Phase::Delete))?;

    let mut inserted = 0;
    if !rows.is_empty() {
        info!("inserting all rows");
        inserted = tx
            .insert_rows(schema, rows)
            .map_err(WriteError::at(Phase::Insert))?;
    }
    Ok(WriteOutcome::Replaced { deleted, inserted })
}
