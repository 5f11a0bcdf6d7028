//! Phase ordering and skipping, observed through a recording transaction.

use sheetsync_engine::executor::{apply_full_replace, apply_plan};
use sheetsync_engine::identity::resolve_key;
use sheetsync_engine::{Phase, ReconciliationPlan, WriteError, WriteOutcome};
use sheetsync_storage::{IdentitySource, StorageError, StorageResult, TableTransaction};
use sheetsync_types::{ColumnDef, Identity, Row, TableSchema};
use std::collections::HashSet;

#[derive(Default)]
struct RecordingTx {
    calls: Vec<&'static str>,
    fail_on: Option<&'static str>,
}

impl RecordingTx {
    fn failing_on(call: &'static str) -> Self {
        Self {
            calls: Vec::new(),
            fail_on: Some(call),
        }
    }

    fn record(&mut self, call: &'static str) -> StorageResult<()> {
        self.calls.push(call);
        if self.fail_on == Some(call) {
            return Err(StorageError::InvalidData(format!("injected {call} failure")));
        }
        Ok(())
    }
}

impl IdentitySource for RecordingTx {
    fn fetch_column_values(&self, _: &TableSchema, _: &str) -> StorageResult<HashSet<Identity>> {
        Ok(HashSet::new())
    }
}

impl TableTransaction for RecordingTx {
    fn delete_keys(&mut self, _: &TableSchema, _: &str, keys: &[Identity]) -> StorageResult<usize> {
        self.record("delete")?;
        Ok(keys.len())
    }

    fn delete_all(&mut self, _: &TableSchema) -> StorageResult<usize> {
        self.record("delete_all")?;
        Ok(3)
    }

    fn update_rows(&mut self, _: &TableSchema, _: &str, rows: &[Row]) -> StorageResult<usize> {
        self.record("update")?;
        Ok(rows.len())
    }

    fn insert_rows(&mut self, _: &TableSchema, rows: &[Row]) -> StorageResult<usize> {
        self.record("insert")?;
        Ok(rows.len())
    }

    fn commit(self) -> StorageResult<()> {
        Ok(())
    }

    fn rollback(self) -> StorageResult<()> {
        Ok(())
    }
}

fn schema() -> TableSchema {
    TableSchema::new("people", vec![ColumnDef::new("id", "INTEGER")])
}

fn full_plan() -> ReconciliationPlan {
    ReconciliationPlan {
        to_delete: vec![Identity::Integer(1)],
        to_update: vec![Row::new().with("id", 2), Row::new().with("id", 3)],
        to_insert: vec![Row::new().with("id", 4)],
    }
}

#[test]
fn phases_run_delete_update_insert() {
    let schema = schema();
    let key = resolve_key(&schema, Some("id")).unwrap().unwrap();
    let mut tx = RecordingTx::default();

    let outcome = apply_plan(&mut tx, &full_plan(), &schema, &key).unwrap();
    assert_eq!(tx.calls, vec!["delete", "update", "insert"]);
    assert_eq!(
        outcome,
        WriteOutcome::Reconciled {
            deleted: 1,
            updated: 2,
            inserted: 1
        }
    );
}

#[test]
fn empty_phases_issue_no_calls() {
    let schema = schema();
    let key = resolve_key(&schema, Some("id")).unwrap().unwrap();
    let mut tx = RecordingTx::default();
    let plan = ReconciliationPlan {
        to_update: Vec::new(),
        ..full_plan()
    };

    apply_plan(&mut tx, &plan, &schema, &key).unwrap();
    assert_eq!(tx.calls, vec!["delete", "insert"]);

    let mut tx = RecordingTx::default();
    apply_plan(&mut tx, &ReconciliationPlan::default(), &schema, &key).unwrap();
    assert!(tx.calls.is_empty());
}

#[test]
fn failure_stops_later_phases() {
    let schema = schema();
    let key = resolve_key(&schema, Some("id")).unwrap().unwrap();
    let mut tx = RecordingTx::failing_on("update");

    let err = apply_plan(&mut tx, &full_plan(), &schema, &key).unwrap_err();
    assert_eq!(tx.calls, vec!["delete", "update"]);
    assert_eq!(err.phase(), Some(Phase::Update));
    assert!(err.is_retryable());
    assert!(err.to_string().starts_with("update phase failed"));
    assert!(matches!(err, WriteError::Store { .. }));
}

#[test]
fn full_replace_deletes_then_inserts() {
    let mut tx = RecordingTx::default();
    let rows = vec![Row::new().with("id", 1), Row::new().with("id", 2)];
    let outcome = apply_full_replace(&mut tx, &rows, &schema()).unwrap();
    assert_eq!(tx.calls, vec!["delete_all", "insert"]);
    assert_eq!(
        outcome,
        WriteOutcome::Replaced {
            deleted: 3,
            inserted: 2
        }
    );
}

#[test]
fn full_replace_with_no_rows_skips_insert() {
    let mut tx = RecordingTx::default();
    apply_full_replace(&mut tx, &[], &schema()).unwrap();
    assert_eq!(tx.calls, vec!["delete_all"]);
}

#[test]
fn full_replace_insert_failure_is_tagged() {
    let mut tx = RecordingTx::failing_on("insert");
    let err = apply_full_replace(&mut tx, &[Row::new().with("id", 1)], &schema()).unwrap_err();
    assert_eq!(err.phase(), Some(Phase::Insert));
}
