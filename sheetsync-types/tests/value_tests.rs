use proptest::prelude::*;
use sheetsync_types::{ColumnType, Identity, Value};
use std::collections::HashSet;

// ── Identity ─────────────────────────────────────────────────────

#[test]
fn identity_from_values() {
    assert_eq!(Value::Integer(3).to_identity(), Some(Identity::Integer(3)));
    assert_eq!(Value::from("abc").to_identity(), Some(Identity::from("abc")));
    assert_eq!(Value::Null.to_identity(), None);
    assert_eq!(Value::from("").to_identity(), None);
    assert_eq!(Value::Blob(vec![]).to_identity(), None);
    assert_eq!(Value::Real(f64::NAN).to_identity(), None);
}

#[test]
fn real_identity_folds_negative_zero() {
    assert_eq!(Identity::real(-0.0), Identity::real(0.0));
}

#[test]
fn identity_round_trips_to_value() {
    let id = Identity::real(2.5).unwrap();
    assert_eq!(id.to_value(), Value::Real(2.5));
    assert_eq!(Identity::Integer(9).to_value(), Value::Integer(9));
}

#[test]
fn identities_hash_and_order() {
    let set: HashSet<Identity> = [Identity::Integer(1), Identity::Integer(1), Identity::from("1")]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 2);

    let mut ids = vec![Identity::Integer(3), Identity::Integer(1), Identity::Integer(2)];
    ids.sort();
    assert_eq!(ids, vec![Identity::Integer(1), Identity::Integer(2), Identity::Integer(3)]);
}

#[test]
fn identity_display() {
    assert_eq!(Identity::Integer(5).to_string(), "5");
    assert_eq!(Identity::from("k-1").to_string(), "k-1");
}

// ── Coercion ─────────────────────────────────────────────────────

#[test]
fn text_to_integer() {
    assert_eq!(Value::from(" 42 ").coerce(ColumnType::Integer), Value::Integer(42));
    assert_eq!(Value::from("4.0").coerce(ColumnType::Integer), Value::Integer(4));
    assert_eq!(Value::from("4.5").coerce(ColumnType::Integer), Value::Real(4.5));
    assert_eq!(Value::from("abc").coerce(ColumnType::Integer), Value::from("abc"));
}

#[test]
fn text_to_real() {
    assert_eq!(Value::from("1.25").coerce(ColumnType::Real), Value::Real(1.25));
    assert_eq!(Value::from("n/a").coerce(ColumnType::Real), Value::from("n/a"));
}

#[test]
fn numbers_to_text() {
    assert_eq!(Value::Integer(7).coerce(ColumnType::Text), Value::from("7"));
    assert_eq!(Value::Real(1.5).coerce(ColumnType::Text), Value::from("1.5"));
}

#[test]
fn null_and_blob_untouched() {
    assert_eq!(Value::Null.coerce(ColumnType::Integer), Value::Null);
    assert_eq!(Value::Blob(vec![1]).coerce(ColumnType::Text), Value::Blob(vec![1]));
}

#[test]
fn bool_and_option_conversions() {
    assert_eq!(Value::from(true), Value::Integer(1));
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}

proptest! {
    /// Any integer rendered as text coerces back to the same integer.
    #[test]
    fn integer_text_coerces_exactly(i in any::<i64>()) {
        prop_assert_eq!(Value::from(i.to_string()).coerce(ColumnType::Integer), Value::Integer(i));
    }

    /// Text columns never change text values.
    #[test]
    fn text_affinity_keeps_text(s in "[a-zA-Z0-9 .]{0,20}") {
        prop_assert_eq!(Value::from(s.clone()).coerce(ColumnType::Text), Value::Text(s));
    }
}
