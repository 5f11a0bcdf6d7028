//! Rows keyed by canonical column name.

use crate::{Error, Identity, Result, TableSchema, Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Normalizes a column name for comparison.
///
/// Column names are case-insensitive; every set comparison in sheetsync is
/// done on the lower-cased form.
#[must_use]
pub fn canonical_column(name: &str) -> String {
    name.to_lowercase()
}

/// One incoming record: a mapping from column name to value.
///
/// Keys are stored in canonical form, so `row.get("Email")` and
/// `row.get("email")` address the same cell. Column order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a cell, returning the previous value for that column.
    pub fn insert(&mut self, column: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(canonical_column(column), value.into())
    }

    /// Returns the value for a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(&canonical_column(column))
    }

    /// Returns true if the row carries the column, even as `Null`.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(&canonical_column(column))
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.0.remove(&canonical_column(column))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical column names, sorted.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Cells in canonical column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the identity held in `column`, if present and usable.
    #[must_use]
    pub fn identity(&self, column: &str) -> Option<Identity> {
        self.get(column).and_then(Value::to_identity)
    }

    /// Coerces every cell towards the affinity of its table column.
    ///
    /// Cells for columns the table does not declare are left untouched.
    #[must_use]
    pub fn coerce_to(self, schema: &TableSchema) -> Row {
        self.0
            .into_iter()
            .map(|(name, value)| match schema.column(&name) {
                Some(col) => (name, value.coerce(col.column_type)),
                None => (name, value),
            })
            .collect()
    }

    /// Builds a row from a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Row> {
        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect()),
            other => Err(Error::NotAnObject(json_kind(&other).to_string())),
        }
    }

    /// Parses a JSON array of objects into a batch.
    pub fn batch_from_json_str(json: &str) -> Result<Vec<Row>> {
        let items: Vec<serde_json::Value> = serde_json::from_str(json)?;
        items.into_iter().map(Row::from_json).collect()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k.as_ref(), v);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
