//! Query parameter values.
//!
//! A parameter is either a single text value, an ordered list of text values
//! (serialized as one comma-joined query value), or a tombstone meaning
//! "explicitly cleared".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value held by a query parameter key.
///
/// `Null` is a tombstone: the key is known but cleared. Tombstones are never
/// serialized into a URL; a key that is absent from the store is never
/// serialized either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Cleared value.
    #[default]
    Null,
    /// Single value.
    Text(String),
    /// Ordered multi-value (multi-select filters).
    List(Vec<String>),
}

impl ParamValue {
    /// Whether this value should be dropped from the serialized query.
    ///
    /// Empty means `Null`, the empty string, or a zero-length list.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::Text(text) => text.is_empty(),
            ParamValue::List(items) => items.is_empty(),
        }
    }

    /// Single text value, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether `needle` equals the text value or is one of the list items.
    pub fn contains_text(&self, needle: &str) -> bool {
        match self {
            ParamValue::Null => false,
            ParamValue::Text(text) => text == needle,
            ParamValue::List(items) => items.iter().any(|item| item == needle),
        }
    }

    /// Coerce a single text value into a one-element list.
    ///
    /// Lists and tombstones are returned unchanged; an empty string becomes an
    /// empty list.
    pub fn into_list(self) -> ParamValue {
        match self {
            ParamValue::Text(text) if text.is_empty() => ParamValue::List(Vec::new()),
            ParamValue::Text(text) => ParamValue::List(vec![text]),
            other => other,
        }
    }

    /// JSON form, used when handing values back to page data.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ParamValue::Null => serde_json::Value::Null,
            ParamValue::Text(text) => serde_json::Value::String(text.clone()),
            ParamValue::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        ParamValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ParamValue::Null,
            Value::String(text) => ParamValue::Text(text),
            Value::Array(items) => ParamValue::List(items.iter().map(json_scalar_text).collect()),
            other => ParamValue::Text(json_scalar_text(&other)),
        }
    }
}

/// Text form of a JSON value as it appears in a query string.
pub fn json_scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
