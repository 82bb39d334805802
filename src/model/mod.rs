//! Domain model types (pure).
//!
//! Descriptor shapes deserialized from page data, query parameter values and
//! row identity. Nothing in this module performs navigation or holds shared
//! state.

pub mod action;
pub mod error;
pub mod identifiers;
pub mod param;
pub mod refinement;
pub mod table;

// Re-export for convenience
pub use action::{Actions, BulkAction, Endpoint, HttpMethod, InlineAction, PageAction};
pub use error::TableError;
pub use identifiers::{RowKey, HYBRID_ID_FIELD};
pub use param::ParamValue;
pub use refinement::{
    Direction, Filter, FilterOption, Refiners, Sort, UnknownDirection, SELECT_FILTER_TYPE,
};
pub use table::{Column, PagingOption, PagingOptions, PreferenceCol, Table};
