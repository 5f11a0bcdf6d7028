use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheetsync_engine::identity::resolve_key;
use sheetsync_engine::planner::plan;
use sheetsync_engine::KeyColumn;
use sheetsync_types::{ColumnDef, Identity, Row, TableSchema};
use std::collections::HashSet;

fn key() -> KeyColumn {
    let schema = TableSchema::new(
        "people",
        vec![ColumnDef::new("id", "INTEGER"), ColumnDef::new("name", "TEXT")],
    );
    resolve_key(&schema, Some("id")).unwrap().unwrap()
}

fn existing(ids: &[i64]) -> HashSet<Identity> {
    ids.iter().copied().map(Identity::Integer).collect()
}

fn row(id: i64) -> Row {
    Row::new().with("id", id).with("name", format!("person {id}"))
}

fn ids_of(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .map(|r| match r.identity("id") {
            Some(Identity::Integer(i)) => i,
            other => panic!("unexpected identity {other:?}"),
        })
        .collect()
}

#[test]
fn reconciliation_scenario() {
    let plan = plan(vec![row(2), row(3), row(4)], &existing(&[1, 2, 3]), &key());
    assert_eq!(plan.to_delete, vec![Identity::Integer(1)]);
    assert_eq!(ids_of(&plan.to_update), vec![2, 3]);
    assert_eq!(ids_of(&plan.to_insert), vec![4]);
}

#[test]
fn empty_batch_deletes_everything() {
    let plan = plan(vec![], &existing(&[2, 1]), &key());
    assert_eq!(plan.to_delete, vec![Identity::Integer(1), Identity::Integer(2)]);
    assert!(plan.to_update.is_empty());
    assert!(plan.to_insert.is_empty());
    assert!(!plan.is_empty());
}

#[test]
fn empty_store_inserts_everything() {
    let plan = plan(vec![row(1), row(2)], &existing(&[]), &key());
    assert!(plan.to_delete.is_empty());
    assert!(plan.to_update.is_empty());
    assert_eq!(ids_of(&plan.to_insert), vec![1, 2]);
}

#[test]
fn unchanged_rows_are_still_updated() {
    let plan = plan(vec![row(1)], &existing(&[1]), &key());
    assert_eq!(plan.to_update, vec![row(1)]);
    assert!(plan.to_insert.is_empty());
}

#[test]
fn duplicate_identities_are_kept_in_one_bucket() {
    let plan = plan(vec![row(5), row(5), row(1), row(1)], &existing(&[1]), &key());
    assert_eq!(ids_of(&plan.to_insert), vec![5, 5]);
    assert_eq!(ids_of(&plan.to_update), vec![1, 1]);
    assert!(plan.to_delete.is_empty());
}

#[test]
fn batch_order_is_preserved() {
    let plan = plan(vec![row(9), row(3), row(7)], &existing(&[]), &key());
    assert_eq!(ids_of(&plan.to_insert), vec![9, 3, 7]);
}

#[test]
fn to_delete_is_sorted() {
    let plan = plan(vec![], &existing(&[30, 10, 20]), &key());
    assert_eq!(
        plan.to_delete,
        vec![Identity::Integer(10), Identity::Integer(20), Identity::Integer(30)]
    );
}

#[test]
fn text_identities_match_exactly() {
    let plan = plan(
        vec![Row::new().with("id", "A-1"), Row::new().with("id", "a-1")],
        &[Identity::from("A-1")].into(),
        &key(),
    );
    assert_eq!(plan.to_update.len(), 1);
    assert_eq!(plan.to_insert.len(), 1);
}

proptest! {
    /// Every row lands in exactly one bucket, buckets agree with the
    /// snapshot, and deletes are exactly the snapshot minus the batch.
    #[test]
    fn plan_partitions_the_batch(
        persisted in prop::collection::hash_set(0i64..50, 0..30),
        batch in prop::collection::vec(0i64..50, 0..40),
    ) {
        let snapshot = existing(&persisted.iter().copied().collect::<Vec<_>>());
        let rows: Vec<Row> = batch.iter().copied().map(row).collect();
        let plan = plan(rows, &snapshot, &key());

        prop_assert_eq!(plan.to_update.len() + plan.to_insert.len(), batch.len());
        for id in ids_of(&plan.to_update) {
            prop_assert!(persisted.contains(&id));
        }
        for id in ids_of(&plan.to_insert) {
            prop_assert!(!persisted.contains(&id));
        }

        let in_batch: HashSet<i64> = batch.iter().copied().collect();
        let mut expected: Vec<i64> = persisted.difference(&in_batch).copied().collect();
        expected.sort();
        let expected: Vec<Identity> = expected.into_iter().map(Identity::Integer).collect();
        prop_assert_eq!(plan.to_delete, expected);
    }
}
