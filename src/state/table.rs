//! Table controller.
//!
//! Assembles the other state managers around one table descriptor: a
//! [`RefinementRegistry`] for sorts and filters, an [`ActionBinder`] for
//! actions and, when the table declares bulk actions, a
//! [`BulkSelectionSet`] keyed by [`RowKey`].
//!
//! Views (`cols`, `rows`, `preferences`) are recomputed on every call from the
//! descriptor and the current params.

use super::actions::ActionBinder;
use super::bulk::{BulkSelectionSet, Selection};
use super::refinements::{RefinementHandle, RefinementOptions, RefinementRegistry};
use crate::model::{
    Column, Direction, PagingOption, ParamValue, PreferenceCol, RowKey, Table, TableError,
};
use crate::navigation::PropertyResolver;
use crate::query::{QueryContext, QueryMap};
use serde_json::Value;
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use tracing::{debug, trace};

type SharedSelection = Rc<RefCell<BulkSelectionSet<RowKey>>>;

// ===== Columns =====

/// A visible column bound to the sort slot.
#[derive(Debug, Clone)]
pub struct ActionableColumn {
    column: Column,
    handle: RefinementHandle,
}

impl ActionableColumn {
    /// The projected column.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Name written to the sort key when this column sorts.
    pub fn sort_name(&self) -> &str {
        self.column.sort_field.as_deref().unwrap_or(&self.column.name)
    }

    /// Loop the sort slot to the column's declared `next_direction`.
    ///
    /// Does nothing for columns without sorting.
    pub fn sort(&self) {
        if !self.column.has_sort {
            trace!(column = %self.column.name, "column is not sortable");
            return;
        }
        self.handle
            .loop_sort(self.sort_name(), self.column.next_direction);
    }

    /// Clear the global sort slot.
    pub fn clear(&self) {
        self.handle.clear_sort();
    }
}

impl Deref for ActionableColumn {
    type Target = Column;

    fn deref(&self) -> &Column {
        &self.column
    }
}

fn project_column(column: &Column, params: &QueryMap, handle: &RefinementHandle) -> Column {
    let keys = handle.keys();
    let mut projected = column.clone();
    if !column.has_sort {
        return projected;
    }
    let Some(current) = params.get(&keys.sort) else {
        return projected;
    };

    let field = column.sort_field.as_deref().unwrap_or(&column.name);
    projected.active = current.as_text() == Some(field);
    projected.direction = if projected.active {
        params
            .get(&keys.order)
            .and_then(ParamValue::as_text)
            .and_then(|text| text.parse::<Direction>().ok())
    } else {
        None
    };
    projected
}

// ===== Rows =====

/// Selection operations bound to one row.
#[derive(Debug, Clone)]
pub struct RowSelection {
    key: RowKey,
    set: SharedSelection,
}

impl RowSelection {
    /// Select the row.
    pub fn select(&self) {
        self.set.borrow_mut().select([&self.key]);
    }

    /// Deselect the row.
    pub fn deselect(&self) {
        self.set.borrow_mut().deselect([&self.key]);
    }

    /// Flip the row's selection.
    pub fn toggle(&self) {
        self.set.borrow_mut().toggle([&self.key]);
    }

    /// Whether the row is selected.
    pub fn is_selected(&self) -> bool {
        self.set.borrow().selected(&self.key)
    }
}

/// A row with its identity and, for bulk tables, selection operations.
#[derive(Debug, Clone)]
pub struct ActionableRow {
    record: Value,
    key: RowKey,
    selection: Option<RowSelection>,
}

impl ActionableRow {
    /// The row as sent by the server.
    pub fn record(&self) -> &Value {
        &self.record
    }

    /// Stable identity of the row.
    pub fn key(&self) -> &RowKey {
        &self.key
    }

    /// Selection operations; `None` when the table has no bulk actions.
    pub fn selection(&self) -> Option<&RowSelection> {
        self.selection.as_ref()
    }

    /// Whether the row is selected. Always `false` without bulk actions.
    pub fn is_selected(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(RowSelection::is_selected)
    }
}

impl Deref for ActionableRow {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.record
    }
}

// ===== Bulk =====

/// Bulk selection over a table's rows.
///
/// Only handed out by [`TableController::bulk`] for tables that declare at
/// least one bulk action.
#[derive(Debug, Clone)]
pub struct BulkSurface {
    set: SharedSelection,
    record_key: String,
}

impl BulkSurface {
    fn keys<'a>(&self, rows: impl IntoIterator<Item = &'a Value>) -> Vec<RowKey> {
        rows.into_iter()
            .map(|row| RowKey::derive(row, &self.record_key))
            .collect()
    }

    /// Select every row, across all pages.
    pub fn select_all(&self) {
        self.set.borrow_mut().select_all();
    }

    /// Deselect every row.
    pub fn deselect_all(&self) {
        self.set.borrow_mut().deselect_all();
    }

    /// Select the given rows.
    pub fn select<'a>(&self, rows: impl IntoIterator<Item = &'a Value>) {
        let keys = self.keys(rows);
        self.set.borrow_mut().select(&keys);
    }

    /// Deselect the given rows.
    pub fn deselect<'a>(&self, rows: impl IntoIterator<Item = &'a Value>) {
        let keys = self.keys(rows);
        self.set.borrow_mut().deselect(&keys);
    }

    /// Flip each of the given rows.
    pub fn toggle<'a>(&self, rows: impl IntoIterator<Item = &'a Value>) {
        let keys = self.keys(rows);
        self.set.borrow_mut().toggle(&keys);
    }

    /// Whether `row` is selected.
    pub fn is_selected(&self, row: &Value) -> bool {
        self.selected(&RowKey::derive(row, &self.record_key))
    }

    /// Whether the row with `key` is selected.
    pub fn selected(&self, key: &RowKey) -> bool {
        self.set.borrow().selected(key)
    }

    /// Whether every row is selected with no exceptions.
    pub fn all_selected(&self) -> bool {
        self.set.borrow().all_selected()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.set.borrow().is_empty()
    }

    /// Snapshot of the raw selection.
    pub fn selection(&self) -> Selection<RowKey> {
        self.set.borrow().selection().clone()
    }
}

// ===== Preferences and paging =====

/// A user-toggleable column bound to its query key.
#[derive(Debug, Clone)]
pub struct ActionablePreference {
    col: PreferenceCol,
    handle: RefinementHandle,
}

impl ActionablePreference {
    /// The preference as declared.
    pub fn col(&self) -> &PreferenceCol {
        &self.col
    }

    /// Write `value` under the preference's key.
    pub fn set(&self, value: impl Into<ParamValue>) {
        self.handle.set(&self.col.name, value.into());
    }

    /// Tombstone the preference's key.
    pub fn clear(&self) {
        self.handle.clear(&self.col.name);
    }
}

impl Deref for ActionablePreference {
    type Target = PreferenceCol;

    fn deref(&self) -> &PreferenceCol {
        &self.col
    }
}

/// Per-page choices bound to their query key.
#[derive(Debug, Clone)]
pub struct ActionablePaging {
    term: String,
    options: Vec<PagingOption>,
    handle: RefinementHandle,
}

impl ActionablePaging {
    /// Query key holding the page size.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Choices, with `active` recomputed from the params once the key is set.
    pub fn options(&self) -> &[PagingOption] {
        &self.options
    }

    /// Change the page size.
    pub fn set_per_page(&self, value: u32) {
        self.handle.set(&self.term, ParamValue::from(value));
    }
}

// ===== TableController =====

/// State of one rendered table.
///
/// Dereferences to its [`RefinementRegistry`], so the whole refinement
/// surface (`apply_sort`, `filters`, `reset`, ...) is available directly.
#[derive(Debug)]
pub struct TableController {
    table: Table,
    registry: RefinementRegistry,
    actions: ActionBinder,
    bulk: Option<SharedSelection>,
}

impl TableController {
    /// Build a controller. Call [`TableController::mount`] to hydrate.
    pub fn new(table: Table, context: QueryContext, options: RefinementOptions) -> Self {
        let registry = RefinementRegistry::new(table.refinements.clone(), context.clone(), options);
        let actions = ActionBinder::new(table.actions.clone(), context.navigator);
        let bulk = table
            .has_bulk_actions()
            .then(|| Rc::new(RefCell::new(BulkSelectionSet::new())));

        debug!(
            record_key = %table.record_key,
            cols = table.cols.len(),
            rows = table.rows.len(),
            bulk = bulk.is_some(),
            "built table controller"
        );
        Self {
            table,
            registry,
            actions,
            bulk,
        }
    }

    /// Build a controller from the table at `path` in page data.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingProps`] if nothing exists at `path`, or
    /// [`TableError::InvalidDescriptor`] if the value is not a table.
    pub fn from_props<R: PropertyResolver + ?Sized>(
        resolver: &R,
        path: &str,
        context: QueryContext,
        options: RefinementOptions,
    ) -> Result<Self, TableError> {
        let value = resolver
            .resolve(path)
            .ok_or_else(|| TableError::MissingProps {
                path: path.to_string(),
            })?;
        let table: Table =
            serde_json::from_value(value).map_err(|source| TableError::InvalidDescriptor {
                path: path.to_string(),
                source,
            })?;
        Ok(Self::new(table, context, options))
    }

    /// Hydrate refinements from the URL.
    pub fn mount(&self) {
        self.registry.mount();
    }

    /// Replace the descriptor after the server re-rendered the table.
    ///
    /// Params and the current selection survive. Selection is dropped only
    /// when the new descriptor has no bulk actions.
    pub fn set_table(&mut self, table: Table) {
        self.registry.set_refiners(table.refinements.clone());
        self.actions = ActionBinder::new(
            table.actions.clone(),
            Rc::clone(&self.registry.store().context().navigator),
        );
        self.bulk = match (self.bulk.take(), table.has_bulk_actions()) {
            (Some(set), true) => Some(set),
            (None, true) => Some(Rc::new(RefCell::new(BulkSelectionSet::new()))),
            (_, false) => None,
        };
        self.table = table;
    }

    /// The descriptor.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Field naming each row's identity.
    pub fn record_key(&self) -> &str {
        &self.table.record_key
    }

    /// Refinement state.
    pub fn refinements(&self) -> &RefinementRegistry {
        &self.registry
    }

    /// Bound actions.
    pub fn actions(&self) -> &ActionBinder {
        &self.actions
    }

    /// Pagination metadata, unmodified.
    pub fn meta(&self) -> &Value {
        &self.table.meta
    }

    /// Visible columns.
    pub fn cols(&self) -> Vec<ActionableColumn> {
        let params = self.registry.params();
        let handle = self.registry.refinement_handle();
        self.table
            .cols
            .iter()
            .filter(|column| !column.hidden)
            .map(|column| ActionableColumn {
                column: project_column(column, &params, &handle),
                handle: handle.clone(),
            })
            .collect()
    }

    /// Rows with keys and, for bulk tables, selection operations.
    pub fn rows(&self) -> Vec<ActionableRow> {
        self.table
            .rows
            .iter()
            .map(|record| {
                let key = RowKey::derive(record, &self.table.record_key);
                let selection = self.bulk.as_ref().map(|set| RowSelection {
                    key: key.clone(),
                    set: Rc::clone(set),
                });
                ActionableRow {
                    record: record.clone(),
                    key,
                    selection,
                }
            })
            .collect()
    }

    /// Bulk selection; `None` unless the table declares a bulk action.
    pub fn bulk(&self) -> Option<BulkSurface> {
        self.bulk.as_ref().map(|set| BulkSurface {
            set: Rc::clone(set),
            record_key: self.table.record_key.clone(),
        })
    }

    /// Toggleable columns; `None` unless the table declares any.
    pub fn preferences(&self) -> Option<Vec<ActionablePreference>> {
        let handle = self.registry.refinement_handle();
        self.table.preference_cols.as_ref().map(|cols| {
            cols.iter()
                .map(|col| ActionablePreference {
                    col: col.clone(),
                    handle: handle.clone(),
                })
                .collect()
        })
    }

    /// Per-page selector; `None` unless the table declares one.
    pub fn paging_options(&self) -> Option<ActionablePaging> {
        let paging = self.table.paging_options.as_ref()?;
        let current = self.registry.store().value(&paging.term);
        let options = paging
            .options
            .iter()
            .map(|option| {
                let mut option = option.clone();
                if let Some(current) = &current {
                    option.active = current.as_text() == Some(option.value.to_string().as_str());
                }
                option
            })
            .collect();

        Some(ActionablePaging {
            term: paging.term.clone(),
            options,
            handle: self.registry.refinement_handle(),
        })
    }
}

impl Deref for TableController {
    type Target = RefinementRegistry;

    fn deref(&self) -> &RefinementRegistry {
        &self.registry
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
