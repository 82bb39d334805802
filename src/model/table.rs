//! Table descriptor.
//!
//! The descriptor is owned by the rendering layer and never mutated here;
//! controllers only derive projections from it.

use crate::model::{Actions, Direction, Refiners};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default record key when a descriptor omits one.
pub const DEFAULT_RECORD_KEY: &str = "id";

fn default_record_key() -> String {
    DEFAULT_RECORD_KEY.to_string()
}

/// A table as declared by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Field naming each row's identity.
    #[serde(rename = "recordKey", alias = "record_key", default = "default_record_key")]
    pub record_key: String,
    /// Declared columns, hidden ones included.
    #[serde(default)]
    pub cols: Vec<Column>,
    /// Current page of rows.
    #[serde(default)]
    pub rows: Vec<Value>,
    /// Pagination or cursor metadata, passed through as sent.
    #[serde(default)]
    pub meta: Value,
    /// Sorts and filters.
    #[serde(default)]
    pub refinements: Refiners,
    /// Row, bulk and page actions.
    #[serde(default)]
    pub actions: Actions,
    /// Per-page selector.
    #[serde(default)]
    pub paging_options: Option<PagingOptions>,
    /// Columns the user can toggle.
    #[serde(default)]
    pub preference_cols: Option<Vec<PreferenceCol>>,
}

impl Table {
    /// Whether any bulk action is declared.
    pub fn has_bulk_actions(&self) -> bool {
        !self.actions.bulk.is_empty()
    }
}

/// A declared column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    /// Field name.
    pub name: String,
    /// Display type tag.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Header label.
    #[serde(default)]
    pub label: String,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: Value,
    /// Placeholder for empty cells.
    #[serde(default)]
    pub fallback: Option<String>,
    /// Whether clicking the header sorts.
    #[serde(default)]
    pub has_sort: bool,
    /// Whether the column's sort is applied.
    #[serde(default)]
    pub active: bool,
    /// Current sort direction.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Direction on next header click; `None` clears the sort.
    #[serde(default)]
    pub next_direction: Option<Direction>,
    /// Sort name written to the sort key.
    #[serde(default)]
    pub sort_field: Option<String>,
    /// Excluded from the derived column list.
    #[serde(default)]
    pub hidden: bool,
    /// Responsive breakpoint.
    #[serde(default)]
    pub breakpoint: Option<String>,
    /// Visible to screen readers only.
    #[serde(default)]
    pub sr_only: bool,
    /// Toggleable by user preference.
    #[serde(default)]
    pub dynamic: bool,
    /// Current preference state of a dynamic column.
    #[serde(default)]
    pub dynamic_active: bool,
}

/// One per-page choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingOption {
    /// Page size.
    pub value: u32,
    /// Display label.
    pub label: u32,
    /// Whether this size is selected.
    #[serde(default)]
    pub active: bool,
}

/// Per-page selector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingOptions {
    /// Choices.
    #[serde(default)]
    pub options: Vec<PagingOption>,
    /// Query key holding the page size.
    pub term: String,
}

/// A column the user can show or hide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceCol {
    /// Query key of the preference.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Whether currently shown.
    #[serde(default)]
    pub active: bool,
}
