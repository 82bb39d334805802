//! Table state managers.
//!
//! Everything here is single-threaded and driven by the store's scheduler;
//! derived views are recomputed from the current params on each read.

pub mod actions;
pub mod bulk;
pub mod refinements;
pub mod table;

// Re-export for convenience
pub use actions::{ActionBinder, ActionablePageAction};
pub use bulk::{BulkSelectionSet, Selection};
pub use refinements::{
    ActionableFilter, ActionableSort, RefinementOptions, RefinementRegistry, SortKeys,
    DEFAULT_ORDER_KEY, DEFAULT_SORT_KEY,
};
pub use table::{
    ActionableColumn, ActionablePaging, ActionablePreference, ActionableRow, BulkSurface,
    RowSelection, TableController,
};
