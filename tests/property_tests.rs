//! Property-based tests for selection, refinement and serialization invariants.
//!
//! Tests validate:
//! 1. Bulk selection agrees with a plain set model under any operation sequence
//! 2. Toggling a row twice restores its selection
//! 3. At most one sort is active after any sequence of sort operations
//! 4. Serialized params never carry empty values
//! 5. Updates never carry the page key

use proptest::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;
use tablestate::model::{Direction, ParamValue, Refiners, Sort};
use tablestate::navigation::MemoryNavigator;
use tablestate::query::{codec, MicrotaskQueue, QueryContext, QueryOptions, QueryParamStore};
use tablestate::state::{BulkSelectionSet, RefinementOptions, RefinementRegistry};

const UNIVERSE: u8 = 16;

fn context() -> QueryContext {
    let nav = Rc::new(MemoryNavigator::new("https://app.test/items?page=3").expect("valid url"));
    QueryContext::new(nav, Rc::new(MicrotaskQueue::new()))
}

// ===== Property 1: Selection Model =====

#[derive(Debug, Clone)]
enum SelectionOp {
    SelectAll,
    DeselectAll,
    Select(u8),
    Deselect(u8),
    Toggle(u8),
}

fn selection_op() -> impl Strategy<Value = SelectionOp> {
    prop_oneof![
        Just(SelectionOp::SelectAll),
        Just(SelectionOp::DeselectAll),
        (0..UNIVERSE).prop_map(SelectionOp::Select),
        (0..UNIVERSE).prop_map(SelectionOp::Deselect),
        (0..UNIVERSE).prop_map(SelectionOp::Toggle),
    ]
}

fn apply(bulk: &mut BulkSelectionSet<u8>, model: &mut HashSet<u8>, op: &SelectionOp) {
    match *op {
        SelectionOp::SelectAll => {
            bulk.select_all();
            model.extend(0..UNIVERSE);
        }
        SelectionOp::DeselectAll => {
            bulk.deselect_all();
            model.clear();
        }
        SelectionOp::Select(row) => {
            bulk.select([&row]);
            model.insert(row);
        }
        SelectionOp::Deselect(row) => {
            bulk.deselect([&row]);
            model.remove(&row);
        }
        SelectionOp::Toggle(row) => {
            bulk.toggle([&row]);
            if !model.remove(&row) {
                model.insert(row);
            }
        }
    }
}

proptest! {
    #[test]
    fn selection_matches_set_model(ops in prop::collection::vec(selection_op(), 0..40)) {
        let mut bulk = BulkSelectionSet::new();
        let mut model = HashSet::new();

        for op in &ops {
            apply(&mut bulk, &mut model, op);

            let selection = bulk.selection();
            if selection.all {
                prop_assert!(selection.only.is_empty(), "only must stay empty under all");
            } else {
                prop_assert!(selection.except.is_empty(), "except must stay empty without all");
            }
            for row in 0..UNIVERSE {
                prop_assert_eq!(bulk.selected(&row), model.contains(&row), "row {} after {:?}", row, op);
            }
        }
    }

    #[test]
    fn select_all_then_deselect_then_select_restores_all(row in 0..UNIVERSE) {
        let mut bulk = BulkSelectionSet::new();
        bulk.select_all();
        prop_assert!(bulk.selected(&row));

        bulk.deselect([&row]);
        prop_assert!(!bulk.selected(&row));
        prop_assert!(!bulk.all_selected());

        bulk.select([&row]);
        prop_assert!(bulk.selected(&row));
        prop_assert!(bulk.all_selected());
    }
}

// ===== Property 2: Toggle Involution =====

proptest! {
    #[test]
    fn toggle_twice_is_identity(
        ops in prop::collection::vec(selection_op(), 0..20),
        row in 0..UNIVERSE,
    ) {
        let mut bulk = BulkSelectionSet::new();
        let mut model = HashSet::new();
        for op in &ops {
            apply(&mut bulk, &mut model, op);
        }

        let before = bulk.selected(&row);
        bulk.toggle([&row]);
        bulk.toggle([&row]);
        prop_assert_eq!(bulk.selected(&row), before);
    }
}

// ===== Property 3: Single Active Sort =====

const SORT_NAMES: [&str; 4] = ["name", "email", "created", "score"];

#[derive(Debug, Clone)]
enum SortOp {
    Apply(usize, Direction),
    Loop(usize, Option<Direction>),
    Clear,
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Asc), Just(Direction::Desc)]
}

fn sort_op() -> impl Strategy<Value = SortOp> {
    prop_oneof![
        (0..SORT_NAMES.len(), direction()).prop_map(|(i, d)| SortOp::Apply(i, d)),
        (0..SORT_NAMES.len(), prop::option::of(direction())).prop_map(|(i, d)| SortOp::Loop(i, d)),
        Just(SortOp::Clear),
    ]
}

fn registry() -> RefinementRegistry {
    let sorts = SORT_NAMES
        .iter()
        .map(|name| {
            serde_json::from_value::<Sort>(serde_json::json!({ "name": name })).expect("valid sort")
        })
        .collect();
    let registry = RefinementRegistry::new(
        Refiners {
            sorts,
            filters: Vec::new(),
        },
        context(),
        RefinementOptions::default().with_watch(false),
    );
    registry.mount();
    registry
}

proptest! {
    #[test]
    fn at_most_one_sort_is_active(ops in prop::collection::vec(sort_op(), 0..30)) {
        let registry = registry();

        for op in &ops {
            match *op {
                SortOp::Apply(i, direction) => registry.apply_sort(SORT_NAMES[i], direction),
                SortOp::Loop(i, direction) => registry.loop_sort(SORT_NAMES[i], direction),
                SortOp::Clear => registry.clear_sort(),
            }
            prop_assert!(registry.current_sorts().len() <= 1);
        }
    }
}

// ===== Property 4 & 5: Serialization =====

fn param_value() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        Just(ParamValue::Null),
        "[a-z ]{0,5}".prop_map(ParamValue::Text),
        prop::collection::vec("[a-z]{1,3}", 0..3).prop_map(ParamValue::List),
    ]
}

fn store_with(entries: &[(String, ParamValue)]) -> QueryParamStore {
    let store = QueryParamStore::new(context(), QueryOptions::default().with_watch(false));
    store.mount();
    for (key, value) in entries {
        store.set(key.as_str(), value.clone());
    }
    store
}

proptest! {
    #[test]
    fn url_params_never_contain_empty_values(
        entries in prop::collection::vec(("[a-z]{1,6}", param_value()), 0..12),
    ) {
        let store = store_with(&entries);

        for (key, value) in store.url_params() {
            prop_assert!(!value.is_empty(), "key {} serialized empty value {:?}", key, value);
        }
    }

    #[test]
    fn update_never_carries_page(
        entries in prop::collection::vec(("[a-z]{1,6}", param_value()), 0..12),
        page in 1u32..100,
    ) {
        let store = store_with(&entries);
        store.set("page", page);

        let url = store.update();
        let query = url.split_once('?').map(|(_, query)| query).unwrap_or("");
        prop_assert!(!codec::parse(query).contains_key("page"), "page leaked into {}", url);
    }
}
