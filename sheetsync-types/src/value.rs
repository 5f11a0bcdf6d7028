//! Cell values and primary-key identities.

use crate::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value.
///
/// Variants mirror the SQLite storage classes so a value read from a sheet
/// can be bound to a statement without further interpretation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the identity this value represents, if any.
    ///
    /// `Null`, empty text and NaN are never identities.
    #[must_use]
    pub fn to_identity(&self) -> Option<Identity> {
        match self {
            Value::Null => None,
            Value::Integer(i) => Some(Identity::Integer(*i)),
            Value::Real(f) => Identity::real(*f),
            Value::Text(s) if s.is_empty() => None,
            Value::Text(s) => Some(Identity::Text(s.clone())),
            Value::Blob(b) if b.is_empty() => None,
            Value::Blob(b) => Some(Identity::Blob(b.clone())),
        }
    }

    /// Converts the value towards a column's type affinity.
    ///
    /// Follows SQLite's affinity rules: text that parses as a number is
    /// stored as a number in numeric columns, integral reals collapse to
    /// integers, and anything that does not convert is kept as is.
    #[must_use]
    pub fn coerce(self, affinity: ColumnType) -> Value {
        match (self, affinity) {
            (Value::Text(s), ColumnType::Integer | ColumnType::Numeric) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Value::Integer(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    integral(f).map_or(Value::Real(f), Value::Integer)
                } else {
                    Value::Text(s)
                }
            }
            (Value::Text(s), ColumnType::Real) => {
                let parsed = s.trim().parse::<f64>();
                parsed.map_or(Value::Text(s), Value::Real)
            }
            (Value::Real(f), ColumnType::Integer | ColumnType::Numeric) => {
                integral(f).map_or(Value::Real(f), Value::Integer)
            }
            (Value::Integer(i), ColumnType::Real) => Value::Real(i as f64),
            (Value::Integer(i), ColumnType::Text) => Value::Text(i.to_string()),
            (Value::Real(f), ColumnType::Text) => Value::Text(f.to_string()),
            (value, _) => value,
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; the bound below is exclusive
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() == 0.0 && f >= -LIMIT && f < LIMIT {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Real),
            },
            serde_json::Value::String(s) => Value::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Text(nested.to_string())
            }
        }
    }
}

/// The primary-key value of a row.
///
/// Unlike [`Value`], an identity is hashable and totally ordered, so it can
/// live in sets and be sorted for deterministic plans. Reals are held by
/// their bit pattern with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Identity {
    Integer(i64),
    Real(u64),
    Text(String),
    Blob(Vec<u8>),
}

impl Identity {
    /// Builds a real-valued identity. NaN has no identity.
    #[must_use]
    pub fn real(f: f64) -> Option<Self> {
        if f.is_nan() {
            return None;
        }
        let f = if f == 0.0 { 0.0 } else { f };
        Some(Identity::Real(f.to_bits()))
    }

    /// Converts back into a bindable value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Identity::Integer(i) => Value::Integer(*i),
            Identity::Real(bits) => Value::Real(f64::from_bits(*bits)),
            Identity::Text(s) => Value::Text(s.clone()),
            Identity::Blob(b) => Value::Blob(b.clone()),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Integer(i) => write!(f, "{i}"),
            Identity::Real(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Identity::Text(s) => write!(f, "{s}"),
            Identity::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for Identity {
    fn from(v: i64) -> Self {
        Identity::Integer(v)
    }
}

impl From<&str> for Identity {
    fn from(v: &str) -> Self {
        Identity::Text(v.to_string())
    }
}

impl From<String> for Identity {
    fn from(v: String) -> Self {
        Identity::Text(v)
    }
}
