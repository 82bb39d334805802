//! Sort and filter refinements bound to query state.
//!
//! The registry wraps a table's declared sorts and filters and maps
//! high-level operations (apply a sort, clear a filter, cycle a column's sort
//! direction) onto writes in its [`QueryParamStore`].
//!
//! Actionable refinements are recomputed from the store on every read; they
//! are never mutated in place. Sorting uses one global slot: a `sort` key with
//! the sort name and an `order` key with its direction. Applying a second sort
//! overwrites the first.

use crate::model::param::json_scalar_text;
use crate::model::{Direction, Filter, ParamValue, Refiners, Sort, SELECT_FILTER_TYPE};
use crate::query::{QueryContext, QueryMap, QueryOptions, QueryParamStore, WeakQueryParamStore};
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;
use tracing::{debug, trace};

/// Default query key holding the active sort name.
pub const DEFAULT_SORT_KEY: &str = "sort";

/// Default query key holding the active sort direction.
pub const DEFAULT_ORDER_KEY: &str = "order";

// ===== Options =====

/// Query keys of the single sort slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeys {
    /// Key holding the sort name.
    pub sort: String,
    /// Key holding the direction.
    pub order: String,
}

impl Default for SortKeys {
    fn default() -> Self {
        Self {
            sort: DEFAULT_SORT_KEY.to_string(),
            order: DEFAULT_ORDER_KEY.to_string(),
        }
    }
}

/// Options of a [`RefinementRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RefinementOptions {
    /// Options of the underlying store.
    pub query: QueryOptions,
    /// Sort slot keys.
    pub keys: SortKeys,
}

impl RefinementOptions {
    /// Enable or disable automatic propagation.
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.query.watch = watch;
        self
    }

    /// Register a serialization transform.
    pub fn with_transform(
        mut self,
        key: impl Into<String>,
        transform: impl Fn(&ParamValue) -> ParamValue + 'static,
    ) -> Self {
        self.query.transforms.insert(key, transform);
        self
    }

    /// Replace the store options.
    pub fn with_query(mut self, query: QueryOptions) -> Self {
        self.query = query;
        self
    }
}

// ===== Store operations =====

fn write_sort(store: &QueryParamStore, keys: &SortKeys, name: &str, direction: Direction) {
    trace!(name, %direction, "apply sort");
    store.set(keys.sort.as_str(), name);
    store.set(keys.order.as_str(), direction.as_str());
}

fn erase_sort(store: &QueryParamStore, keys: &SortKeys) {
    trace!("clear sort");
    store.clear(keys.sort.as_str());
    store.clear(keys.order.as_str());
}

fn cycle_sort(store: &QueryParamStore, keys: &SortKeys, name: &str, direction: Option<Direction>) {
    match direction {
        Some(direction) => write_sort(store, keys, name, direction),
        None => erase_sort(store, keys),
    }
}

fn write_filter(store: &QueryParamStore, name: &str, value: ParamValue, kind: Option<&str>) {
    trace!(name, value = %value, kind, "apply filter");
    if kind != Some(SELECT_FILTER_TYPE) {
        store.set(name, value);
        return;
    }

    match value {
        ParamValue::Null => store.clear(name),
        ParamValue::Text(text) => store.add(name, text),
        ParamValue::List(items) => {
            for item in items {
                store.add(name, item);
            }
        }
    }
}

// ===== Projection =====

/// Recompute a sort's `active` and `direction` from the params.
///
/// `next_direction` belongs to the provider and is never rewritten. Without
/// a sort slot in the params (not yet hydrated) the descriptor is returned
/// as the server sent it.
pub(crate) fn project_sort(sort: &Sort, params: &QueryMap, keys: &SortKeys) -> Sort {
    let Some(current) = params.get(&keys.sort) else {
        return sort.clone();
    };
    let current_order = params
        .get(&keys.order)
        .and_then(ParamValue::as_text)
        .and_then(|text| text.parse::<Direction>().ok());

    let active = current.as_text() == Some(sort.name.as_str())
        && sort.direction.map_or(true, |fixed| current_order == Some(fixed));

    let mut projected = sort.clone();
    projected.active = active;
    if sort.direction.is_none() {
        projected.direction = if active { current_order } else { None };
    }
    projected
}

/// Recompute a filter's state from the params.
pub(crate) fn project_filter(filter: &Filter, params: &QueryMap) -> Filter {
    let Some(current) = params.get(&filter.name) else {
        return filter.clone();
    };

    let mut projected = filter.clone();
    projected.active = !current.is_empty();
    projected.value = current.to_json();
    for option in &mut projected.options {
        option.active = current.contains_text(&json_scalar_text(&option.value));
    }
    projected
}

// ===== Handle =====

/// Weak binding from a projection back to the registry's store.
#[derive(Debug, Clone)]
pub(crate) struct RefinementHandle {
    store: WeakQueryParamStore,
    keys: Rc<SortKeys>,
}

impl RefinementHandle {
    fn with_store(&self, operation: &str, apply: impl FnOnce(&QueryParamStore, &SortKeys)) {
        match self.store.upgrade() {
            Some(store) => apply(&store, &self.keys),
            None => debug!(operation, "refinement store is gone; ignoring"),
        }
    }

    pub(crate) fn loop_sort(&self, name: &str, direction: Option<Direction>) {
        self.with_store("loop_sort", |store, keys| {
            cycle_sort(store, keys, name, direction);
        });
    }

    pub(crate) fn clear_sort(&self) {
        self.with_store("clear_sort", erase_sort);
    }

    pub(crate) fn set(&self, key: &str, value: ParamValue) {
        self.with_store("set", |store, _| store.set(key, value));
    }

    pub(crate) fn clear(&self, key: &str) {
        self.with_store("clear", |store, _| store.clear(key));
    }


    pub(crate) fn keys(&self) -> &SortKeys {
        &self.keys
    }
}

// ===== ActionableSort =====

/// A sort with its state recomputed from the store, plus operations.
#[derive(Debug, Clone)]
pub struct ActionableSort {
    sort: Sort,
    fixed: Option<Direction>,
    handle: RefinementHandle,
}

impl ActionableSort {
    /// The projected sort.
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Drop the bindings and keep the data.
    pub fn into_inner(self) -> Sort {
        self.sort
    }

    /// Activate this sort.
    ///
    /// Fixed-direction sorts apply their direction. Toggle sorts move to the
    /// `next_direction` the provider declared; `None` clears the slot.
    pub fn action(&self) {
        let direction = match self.fixed {
            Some(fixed) => Some(fixed),
            None => self.sort.next_direction,
        };
        self.handle.loop_sort(&self.sort.name, direction);
    }

    /// Clear the global sort slot.
    pub fn clear(&self) {
        self.handle.clear_sort();
    }
}

impl Deref for ActionableSort {
    type Target = Sort;

    fn deref(&self) -> &Sort {
        &self.sort
    }
}

// ===== ActionableFilter =====

/// A filter with its state recomputed from the store, plus operations.
#[derive(Debug, Clone)]
pub struct ActionableFilter {
    filter: Filter,
    handle: RefinementHandle,
}

impl ActionableFilter {
    /// The projected filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Drop the bindings and keep the data.
    pub fn into_inner(self) -> Filter {
        self.filter
    }

    /// Apply `value`. Select filters accumulate; others replace.
    pub fn action(&self, value: impl Into<ParamValue>) {
        let value = value.into();
        self.handle.with_store("apply_filter", |store, _| {
            write_filter(store, &self.filter.name, value, self.filter.kind.as_deref());
        });
    }

    /// Tombstone this filter.
    pub fn clear(&self) {
        self.handle.clear(&self.filter.name);
    }
}

impl Deref for ActionableFilter {
    type Target = Filter;

    fn deref(&self) -> &Filter {
        &self.filter
    }
}

// ===== RefinementRegistry =====

/// Declared refinements of one table and the store they write to.
#[derive(Debug)]
pub struct RefinementRegistry {
    store: QueryParamStore,
    keys: Rc<SortKeys>,
    refiners: Refiners,
    sort_index: HashMap<String, usize>,
    filter_index: HashMap<String, usize>,
}

fn index_by_name<'a>(names: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    names
        .enumerate()
        .map(|(position, name)| (name.to_string(), position))
        .collect()
}

impl RefinementRegistry {
    /// Create a registry with its own store. Call
    /// [`RefinementRegistry::mount`] to hydrate from the URL.
    pub fn new(refiners: Refiners, context: QueryContext, options: RefinementOptions) -> Self {
        let store = QueryParamStore::new(context, options.query);
        let mut registry = Self {
            store,
            keys: Rc::new(options.keys),
            refiners: Refiners::default(),
            sort_index: HashMap::new(),
            filter_index: HashMap::new(),
        };
        registry.set_refiners(refiners);
        registry
    }

    /// The underlying store.
    pub fn store(&self) -> &QueryParamStore {
        &self.store
    }

    /// Declared refinements as received.
    pub fn refiners(&self) -> &Refiners {
        &self.refiners
    }

    /// Sort slot keys.
    pub fn keys(&self) -> &SortKeys {
        &self.keys
    }

    /// Replace the declared refinements, e.g. after a reload.
    ///
    /// Params are untouched; projections pick up the new descriptors.
    pub fn set_refiners(&mut self, refiners: Refiners) {
        self.sort_index = index_by_name(refiners.sorts.iter().map(|sort| sort.name.as_str()));
        self.filter_index =
            index_by_name(refiners.filters.iter().map(|filter| filter.name.as_str()));
        self.refiners = refiners;
    }

    /// Seed and hydrate params without navigating.
    ///
    /// Observation is paused; the sort slot (when any sort is declared) and
    /// every filter key are seeded as tombstones; matching keys from the
    /// current URL overwrite them, and unknown URL keys are ignored. Static
    /// defaults are overlaid last. Observation resumes on the next tick.
    pub fn mount(&self) {
        self.store.pause();

        let mut seeded = QueryMap::new();
        if !self.refiners.sorts.is_empty() {
            seeded.insert(self.keys.sort.clone(), ParamValue::Null);
            seeded.insert(self.keys.order.clone(), ParamValue::Null);
        }
        for filter in &self.refiners.filters {
            seeded.insert(filter.name.clone(), ParamValue::Null);
        }

        for (key, value) in self.store.get() {
            let multiple = self.filter_descriptor(&key).is_some_and(Filter::is_multiple);
            if let Some(slot) = seeded.get_mut(&key) {
                *slot = if multiple { value.into_list() } else { value };
            }
        }

        for (key, value) in &self.store.options().defaults {
            seeded.insert(key.clone(), value.clone());
        }

        debug!(
            sorts = self.refiners.sorts.len(),
            filters = self.refiners.filters.len(),
            "mounted refinements"
        );
        self.store.extend(seeded);
        self.store.resume_next_tick();
    }

    pub(crate) fn refinement_handle(&self) -> RefinementHandle {
        RefinementHandle {
            store: self.store.downgrade(),
            keys: Rc::clone(&self.keys),
        }
    }

    fn filter_descriptor(&self, name: &str) -> Option<&Filter> {
        self.filter_index
            .get(name)
            .and_then(|&position| self.refiners.filters.get(position))
    }

    fn sort_descriptor(&self, name: &str) -> Option<&Sort> {
        self.sort_index
            .get(name)
            .and_then(|&position| self.refiners.sorts.get(position))
    }

    // ----- Reads -----

    /// Snapshot of the store's params.
    pub fn params(&self) -> QueryMap {
        self.store.params()
    }

    /// All sorts in declaration order.
    pub fn sorts(&self) -> Vec<ActionableSort> {
        let params = self.store.params();
        let handle = self.refinement_handle();
        self.refiners
            .sorts
            .iter()
            .map(|sort| ActionableSort {
                sort: project_sort(sort, &params, &self.keys),
                fixed: sort.direction,
                handle: handle.clone(),
            })
            .collect()
    }

    /// All filters in declaration order.
    pub fn filters(&self) -> Vec<ActionableFilter> {
        let params = self.store.params();
        let handle = self.refinement_handle();
        self.refiners
            .filters
            .iter()
            .map(|filter| ActionableFilter {
                filter: project_filter(filter, &params),
                handle: handle.clone(),
            })
            .collect()
    }

    /// Sort named `name`.
    pub fn get_sort(&self, name: &str) -> Option<ActionableSort> {
        self.sort_descriptor(name).map(|sort| ActionableSort {
            sort: project_sort(sort, &self.store.params(), &self.keys),
            fixed: sort.direction,
            handle: self.refinement_handle(),
        })
    }

    /// Filter named `name`.
    pub fn get_filter(&self, name: &str) -> Option<ActionableFilter> {
        self.filter_descriptor(name).map(|filter| ActionableFilter {
            filter: project_filter(filter, &self.store.params()),
            handle: self.refinement_handle(),
        })
    }

    /// Active sorts in declaration order. At most one.
    pub fn current_sorts(&self) -> Vec<ActionableSort> {
        self.sorts().into_iter().filter(|sort| sort.active).collect()
    }

    /// Active filters in declaration order.
    pub fn current_filters(&self) -> Vec<ActionableFilter> {
        self.filters()
            .into_iter()
            .filter(|filter| filter.active)
            .collect()
    }

    /// Whether any sort is active.
    pub fn is_sorting(&self) -> bool {
        !self.current_sorts().is_empty()
    }

    /// Whether any filter is active.
    pub fn is_filtering(&self) -> bool {
        !self.current_filters().is_empty()
    }

    /// Whether the sort named `name` is active.
    pub fn is_sorting_by(&self, name: &str) -> bool {
        self.get_sort(name).is_some_and(|sort| sort.active)
    }

    /// Whether the filter named `name` is active.
    pub fn is_filtering_by(&self, name: &str) -> bool {
        self.get_filter(name).is_some_and(|filter| filter.active)
    }

    // ----- Sorts -----

    /// Make `name` the single active sort.
    pub fn apply_sort(&self, name: &str, direction: Direction) {
        write_sort(&self.store, &self.keys, name, direction);
    }

    /// Clear the sort slot.
    pub fn clear_sort(&self) {
        erase_sort(&self.store, &self.keys);
    }

    /// Clear all sorts. Same as [`RefinementRegistry::clear_sort`]: there is
    /// one slot.
    pub fn clear_sorts(&self) {
        self.clear_sort();
    }

    /// Apply `name` in `direction`, or clear the slot when `direction` is
    /// `None`. Drives the three-state column cycle.
    pub fn loop_sort(&self, name: &str, direction: Option<Direction>) {
        cycle_sort(&self.store, &self.keys, name, direction);
    }

    // ----- Filters -----

    /// Apply `value` to filter `name`. With `kind == Some("select")` values
    /// accumulate; otherwise they replace.
    pub fn apply_filter(&self, name: &str, value: impl Into<ParamValue>, kind: Option<&str>) {
        write_filter(&self.store, name, value.into(), kind);
    }

    /// Tombstone filter `name`.
    pub fn clear_filter(&self, name: &str) {
        trace!(name, "clear filter");
        self.store.clear(name);
    }

    /// Tombstone every declared filter.
    pub fn clear_filters(&self) {
        for filter in &self.refiners.filters {
            self.clear_filter(&filter.name);
        }
    }

    /// Clear sorts and filters.
    pub fn reset(&self) {
        self.clear_sorts();
        self.clear_filters();
    }

    // ----- Passthrough -----

    /// Write an arbitrary param.
    pub fn set(&self, key: &str, value: impl Into<ParamValue>) {
        self.store.set(key, value);
    }

    /// Tombstone an arbitrary param.
    pub fn clear(&self, key: &str) {
        self.store.clear(key);
    }

    /// Navigate with the current params now.
    pub fn update(&self) -> String {
        self.store.update()
    }
}

#[cfg(test)]
#[path = "refinements_tests.rs"]
mod tests;
