//! Row identity.
//!
//! A [`RowKey`] is the stable value used to track a row in a bulk selection.
//! It is derived purely from the row value, so re-rendering the same record
//! with different field values keeps the same key.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Synthetic identity field carried by rows that merge several record types
/// into one table.
pub const HYBRID_ID_FIELD: &str = "__hybridId";

/// Stable identity of a table row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    /// Missing identity (row lacks the key field).
    Null,
    /// Boolean identity.
    Bool(bool),
    /// Integer identity.
    Int(i64),
    /// Text identity. Non-integer numbers use their JSON text form.
    Text(String),
}

impl RowKey {
    /// Derive the key of `row`.
    ///
    /// - Scalars are their own key.
    /// - Records carrying [`HYBRID_ID_FIELD`] use that field.
    /// - Other records use the field named by `record_key`.
    ///
    /// A record without the field yields [`RowKey::Null`].
    pub fn derive(row: &Value, record_key: &str) -> Self {
        match row {
            Value::Object(fields) => fields
                .get(HYBRID_ID_FIELD)
                .or_else(|| fields.get(record_key))
                .map_or(RowKey::Null, RowKey::from_scalar),
            Value::Array(_) => RowKey::Null,
            scalar => RowKey::from_scalar(scalar),
        }
    }

    fn from_scalar(value: &Value) -> Self {
        match value {
            Value::Null => RowKey::Null,
            Value::Bool(flag) => RowKey::Bool(*flag),
            Value::Number(number) => number
                .as_i64()
                .map_or_else(|| RowKey::Text(number.to_string()), RowKey::Int),
            Value::String(text) => RowKey::Text(text.clone()),
            other => RowKey::Text(other.to_string()),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Null => f.write_str("null"),
            RowKey::Bool(flag) => write!(f, "{flag}"),
            RowKey::Int(id) => write!(f, "{id}"),
            RowKey::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        RowKey::Int(value)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        RowKey::Text(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        RowKey::Text(value)
    }
}
