//! Sort and filter descriptors.
//!
//! These are the server-provided refinement shapes. They are plain data; the
//! actionable projections in [`crate::state::refinements`] add behavior.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Filter type whose values accumulate instead of replacing.
pub const SELECT_FILTER_TYPE: &str = "select";

// ===== Direction =====

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Query-string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized sort direction text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort direction: {0:?}")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

// ===== Sort =====

/// A named sort criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    /// Unique name; also the value written to the sort key.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Provider-defined type tag.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: Value,
    /// Whether the sort is currently applied.
    #[serde(default)]
    pub active: bool,
    /// Hidden from pickers.
    #[serde(default)]
    pub hidden: bool,
    /// Provider default marker.
    #[serde(default)]
    pub default: Option<Value>,
    /// Fixed direction for one-way sort options; `None` for toggle sorts.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Direction a toggle would move to on next activation.
    #[serde(default)]
    pub next_direction: Option<Direction>,
}

// ===== Filter =====

/// A selectable option of a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Value written to the filter key when chosen.
    pub value: Value,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: Value,
    /// Whether the current filter value includes this option.
    #[serde(default)]
    pub active: bool,
}

/// A named filter criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Unique name; also the query key.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Filter type. `"select"` filters accumulate values.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: Value,
    /// Whether the filter is currently applied.
    #[serde(default)]
    pub active: bool,
    /// Hidden from pickers.
    #[serde(default)]
    pub hidden: bool,
    /// Provider default value.
    #[serde(default)]
    pub default: Option<Value>,
    /// Current value.
    #[serde(default)]
    pub value: Value,
    /// Choices for option-based filters.
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

impl Filter {
    /// Whether applied values accumulate.
    pub fn is_multiple(&self) -> bool {
        self.kind.as_deref() == Some(SELECT_FILTER_TYPE)
    }
}

// ===== Refiners =====

/// Refinement collections declared by a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Refiners {
    /// Declared sorts.
    #[serde(default)]
    pub sorts: Vec<Sort>,
    /// Declared filters.
    #[serde(default)]
    pub filters: Vec<Filter>,
}
