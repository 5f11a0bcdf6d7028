//! The top-level write operation.

use crate::config::{SnapshotMode, SyncConfig};
use crate::error::{Phase, WriteError, WriteResult};
use crate::executor::{self, WriteOutcome};
use crate::identity::{self, KeyColumn};
use crate::planner::{self, ReconciliationPlan};
use crate::validator;
use sheetsync_storage::{BeginMode, TableStore, TableTransaction};
use sheetsync_types::{Row, TableSchema};
use tracing::{info, warn};

/// What a write would do, computed without writing.
#[derive(Debug, Clone, PartialEq)]
pub enum WritePlan {
    /// Empty batch.
    NoOp,
    /// No key configured: every row is deleted and the batch inserted.
    Replace { rows: Vec<Row> },
    /// Key configured: the reconciliation against the current snapshot.
    Reconcile(ReconciliationPlan),
}

/// Writes batches into tables of a caller-owned store.
///
/// Holds no state between calls besides the store handle. Each write
/// refetches the table schema and, when keyed, the identity snapshot.
pub struct TableSync<S> {
    store: S,
}

impl<S: TableStore> TableSync<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Makes the table match `rows`.
    ///
    /// With a primary key, rows are reconciled by identity: persisted rows
    /// missing from the batch are deleted, matching rows updated and new
    /// rows inserted. Without one, the table's contents are replaced. Either
    /// way the change is one transaction; on error the table is unchanged.
    ///
    /// Rows are first coerced towards the table's column affinities, so a
    /// key given as `"2"` or `2.0` matches a persisted integer `2`. Checks
    /// run in a fixed order and the first failure is reported: the key
    /// column is resolved, every row must carry a key value, then the batch
    /// columns are compared with the table's.
    ///
    /// An empty `rows` is a no-op that does not touch the store.
    pub fn write(&mut self, rows: Vec<Row>, config: &SyncConfig) -> WriteResult<WriteOutcome> {
        if rows.is_empty() {
            info!("no rows received");
            return Ok(WriteOutcome::NoOp);
        }
        info!("config: {:?}", config);

        let (schema, key, rows) = self.prepare(rows, config)?;
        let outcome = match key {
            None => self.replace(&rows, &schema)?,
            Some(key) => self.reconcile(rows, &schema, &key, config.snapshot)?,
        };
        info!("write to {} finished: {:?}", schema.name, outcome);
        Ok(outcome)
    }

    /// Computes what [`write`](Self::write) would do without writing.
    ///
    /// The snapshot is always read outside any transaction.
    pub fn plan(&self, rows: Vec<Row>, config: &SyncConfig) -> WriteResult<WritePlan> {
        if rows.is_empty() {
            return Ok(WritePlan::NoOp);
        }
        let (schema, key, rows) = self.prepare(rows, config)?;
        match key {
            None => Ok(WritePlan::Replace { rows }),
            Some(key) => {
                let existing = planner::snapshot_identities(&self.store, &schema, &key)
                    .map_err(WriteError::at(Phase::Snapshot))?;
                Ok(WritePlan::Reconcile(planner::plan(rows, &existing, &key)))
            }
        }
    }

    fn prepare(
        &self,
        rows: Vec<Row>,
        config: &SyncConfig,
    ) -> WriteResult<(TableSchema, Option<KeyColumn>, Vec<Row>)> {
        let schema = self
            .store
            .fetch_table_schema(&config.table)
            .map_err(WriteError::at(Phase::Schema))?;
        let rows: Vec<Row> = rows.into_iter().map(|row| row.coerce_to(&schema)).collect();

        let key = identity::resolve_key(&schema, config.primary_key())?;
        if let Some(key) = &key {
            identity::ensure_identities(&rows, key)?;
        }
        validator::validate_columns(&rows, &schema, config.exact_match)?;
        Ok((schema, key, rows))
    }

    fn replace(&mut self, rows: &[Row], schema: &TableSchema) -> WriteResult<WriteOutcome> {
        let mut tx = self
            .store
            .begin(BeginMode::Deferred)
            .map_err(WriteError::at(Phase::Begin))?;
        let result = executor::apply_full_replace(&mut tx, rows, schema);
        finish(tx, result)
    }

    fn reconcile(
        &mut self,
        rows: Vec<Row>,
        schema: &TableSchema,
        key: &KeyColumn,
        mode: SnapshotMode,
    ) -> WriteResult<WriteOutcome> {
        match mode {
            SnapshotMode::Detached => {
                let existing = planner::snapshot_identities(&self.store, schema, key)
                    .map_err(WriteError::at(Phase::Snapshot))?;
                let plan = planner::plan(rows, &existing, key);

                let mut tx = self
                    .store
                    .begin(BeginMode::Deferred)
                    .map_err(WriteError::at(Phase::Begin))?;
                let result = executor::apply_plan(&mut tx, &plan, schema, key);
                finish(tx, result)
            }
            SnapshotMode::InTransaction => {
                let mut tx = self
                    .store
                    .begin(BeginMode::Immediate)
                    .map_err(WriteError::at(Phase::Begin))?;
                let result = planner::snapshot_identities(&tx, schema, key)
                    .map_err(WriteError::at(Phase::Snapshot))
                    .map(|existing| planner::plan(rows, &existing, key))
                    .and_then(|plan| executor::apply_plan(&mut tx, &plan, schema, key));
                finish(tx, result)
            }
        }
    }
}

/// Commits on success, rolls back on failure.
fn finish<T: TableTransaction>(
    tx: T,
    result: WriteResult<WriteOutcome>,
) -> WriteResult<WriteOutcome> {
    match result {
        Ok(outcome) => {
            tx.commit().map_err(WriteError::at(Phase::Commit))?;
            Ok(outcome)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!("rollback after failed write also failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}

/// Writes `rows` through a borrowed store. See [`TableSync::write`].
pub fn write<S: TableStore>(
    store: &mut S,
    rows: Vec<Row>,
    config: &SyncConfig,
) -> WriteResult<WriteOutcome> {
    TableSync::new(store).write(rows, config)
}
