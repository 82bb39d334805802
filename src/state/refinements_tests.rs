//! Tests for RefinementRegistry and its projections.

use super::*;
use crate::model::FilterOption;
use crate::navigation::MemoryNavigator;
use crate::query::MicrotaskQueue;
use serde_json::json;

const LOCATION: &str = "https://app.test/users?sort=name&order=asc&status=open&stale=1";

struct Fixture {
    registry: RefinementRegistry,
    nav: Rc<MemoryNavigator>,
    queue: MicrotaskQueue,
}

fn sort(name: &str, direction: Option<Direction>) -> Sort {
    serde_json::from_value(json!({ "name": name, "label": name, "direction": direction }))
        .expect("valid sort")
}

fn filter(name: &str, kind: Option<&str>, options: &[&str]) -> Filter {
    Filter {
        name: name.to_string(),
        label: name.to_string(),
        kind: kind.map(str::to_string),
        metadata: serde_json::Value::Null,
        active: false,
        hidden: false,
        default: None,
        value: serde_json::Value::Null,
        options: options
            .iter()
            .map(|value| FilterOption {
                label: value.to_string(),
                value: json!(value),
                metadata: serde_json::Value::Null,
                active: false,
            })
            .collect(),
    }
}

fn refiners() -> Refiners {
    Refiners {
        sorts: vec![
            sort("name", None),
            sort("email", None),
            sort("newest", Some(Direction::Desc)),
        ],
        filters: vec![
            filter("status", None, &["open", "closed"]),
            filter("tags", Some(SELECT_FILTER_TYPE), &["red", "blue", "green"]),
        ],
    }
}

fn fixture_at(location: &str, options: RefinementOptions) -> Fixture {
    let nav = Rc::new(MemoryNavigator::new(location).expect("valid location"));
    let queue = MicrotaskQueue::new();
    let context = QueryContext::new(nav.clone(), Rc::new(queue.clone()));
    Fixture {
        registry: RefinementRegistry::new(refiners(), context, options),
        nav,
        queue,
    }
}

fn mounted_at(location: &str, options: RefinementOptions) -> Fixture {
    let fx = fixture_at(location, options);
    fx.registry.mount();
    fx.queue.run_until_idle();
    fx
}

fn mounted() -> Fixture {
    mounted_at(LOCATION, RefinementOptions::default())
}

// ===== Mount =====

#[test]
fn mount_hydrates_known_keys_and_ignores_unknown() {
    let fx = mounted();
    let params = fx.registry.params();

    assert_eq!(params["sort"], ParamValue::from("name"));
    assert_eq!(params["order"], ParamValue::from("asc"));
    assert_eq!(params["status"], ParamValue::from("open"));
    assert_eq!(params["tags"], ParamValue::Null);
    assert!(!params.contains_key("stale"));
    assert_eq!(fx.nav.visit_count(), 0);
}

#[test]
fn mount_without_sorts_seeds_no_sort_slot() {
    let nav = Rc::new(MemoryNavigator::new("https://app.test/").expect("valid location"));
    let queue = MicrotaskQueue::new();
    let context = QueryContext::new(nav, Rc::new(queue.clone()));
    let registry = RefinementRegistry::new(
        Refiners {
            sorts: Vec::new(),
            filters: vec![filter("status", None, &[])],
        },
        context,
        RefinementOptions::default(),
    );
    registry.mount();

    let params = registry.params();
    assert!(!params.contains_key("sort"));
    assert!(!params.contains_key("order"));
    assert_eq!(params["status"], ParamValue::Null);
}

#[test]
fn mount_reads_select_filters_as_lists() {
    let fx = mounted_at("https://app.test/posts?tags=red", RefinementOptions::default());
    assert_eq!(fx.registry.params()["tags"], ParamValue::from(vec!["red"]));

    let fx = mounted_at("https://app.test/posts?tags=red,blue", RefinementOptions::default());
    assert_eq!(
        fx.registry.params()["tags"],
        ParamValue::from(vec!["red", "blue"])
    );
}

#[test]
fn mount_then_first_edit_navigates_once() {
    let fx = mounted();

    fx.registry.apply_filter("status", "closed", None);
    fx.queue.run_until_idle();

    assert_eq!(fx.nav.visit_count(), 1);
    let visit = fx.nav.last_visit().expect("visited");
    assert_eq!(
        visit.url,
        "https://app.test/users?order=asc&sort=name&status=closed"
    );
}

// ===== Sorts =====

#[test]
fn hydrated_sort_is_active_with_direction() {
    let fx = mounted();
    let name = fx.registry.get_sort("name").expect("declared");

    assert!(name.active);
    assert_eq!(name.direction, Some(Direction::Asc));
    assert!(fx.registry.is_sorting());
    assert!(fx.registry.is_sorting_by("name"));
    assert!(!fx.registry.is_sorting_by("email"));
}

#[test]
fn applying_sort_replaces_previous_sort() {
    let fx = mounted();
    fx.registry.apply_sort("email", Direction::Desc);

    let current = fx.registry.current_sorts();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].name, "email");
    assert_eq!(current[0].direction, Some(Direction::Desc));
    assert!(!fx.registry.is_sorting_by("name"));
}

#[test]
fn fixed_direction_sort_only_matches_its_direction() {
    let fx = mounted();
    fx.registry.apply_sort("newest", Direction::Asc);
    assert!(!fx.registry.is_sorting_by("newest"));

    fx.registry.apply_sort("newest", Direction::Desc);
    assert!(fx.registry.is_sorting_by("newest"));
}

#[test]
fn clear_sort_tombstones_slot() {
    let fx = mounted();
    fx.registry.clear_sort();

    assert!(!fx.registry.is_sorting());
    assert_eq!(fx.registry.params()["sort"], ParamValue::Null);
    assert_eq!(fx.registry.params()["order"], ParamValue::Null);
}

fn toward(name: &str, next: Option<Direction>) -> Sort {
    serde_json::from_value(json!({ "name": name, "label": name, "next_direction": next }))
        .expect("valid sort")
}

fn rerender_email(registry: &mut RefinementRegistry, next: Option<Direction>) {
    let mut refiners = refiners();
    refiners.sorts[1] = toward("email", next);
    registry.set_refiners(refiners);
}

#[test]
fn hydrated_sort_keeps_declared_next_direction() {
    let mut fx = mounted_at("https://app.test/users", RefinementOptions::default());
    rerender_email(&mut fx.registry, Some(Direction::Desc));

    let email = fx.registry.get_sort("email").expect("declared");
    assert!(!email.active);
    assert_eq!(email.next_direction, Some(Direction::Desc));

    email.action();
    assert_eq!(fx.registry.params()["order"], ParamValue::from("desc"));
    assert_eq!(
        fx.registry.get_sort("email").expect("declared").next_direction,
        Some(Direction::Desc)
    );
}

#[test]
fn sort_action_follows_provider_cycle() {
    let mut fx = mounted_at("https://app.test/users", RefinementOptions::default());
    let direction = |registry: &RefinementRegistry| {
        registry.get_sort("email").and_then(|sort| sort.direction)
    };

    rerender_email(&mut fx.registry, Some(Direction::Asc));
    fx.registry.get_sort("email").expect("declared").action();
    assert_eq!(direction(&fx.registry), Some(Direction::Asc));

    rerender_email(&mut fx.registry, Some(Direction::Desc));
    fx.registry.get_sort("email").expect("declared").action();
    assert_eq!(direction(&fx.registry), Some(Direction::Desc));

    rerender_email(&mut fx.registry, None);
    fx.registry.get_sort("email").expect("declared").action();
    assert_eq!(direction(&fx.registry), None);
    assert!(!fx.registry.is_sorting());
}

#[test]
fn fixed_sort_action_applies_its_direction() {
    let fx = mounted();
    fx.registry.get_sort("newest").expect("declared").action();

    assert_eq!(fx.registry.params()["sort"], ParamValue::from("newest"));
    assert_eq!(fx.registry.params()["order"], ParamValue::from("desc"));
}

#[test]
fn unhydrated_sort_passes_descriptor_through() {
    let fx = fixture_at(LOCATION, RefinementOptions::default());
    let name = fx.registry.get_sort("name").expect("declared");

    assert!(!name.active);
    assert_eq!(name.direction, None);
}

// ===== Filters =====

#[test]
fn hydrated_filter_marks_active_option() {
    let fx = mounted();
    let status = fx.registry.get_filter("status").expect("declared");

    assert!(status.active);
    assert_eq!(status.value, json!("open"));
    let active: Vec<_> = status
        .options
        .iter()
        .filter(|option| option.active)
        .map(|option| option.label.as_str())
        .collect();
    assert_eq!(active, vec!["open"]);
}

#[test]
fn select_filter_accumulates_values() {
    let fx = mounted();
    let tags = fx.registry.get_filter("tags").expect("declared");
    tags.action("red");
    tags.action("blue");

    let tags = fx.registry.get_filter("tags").expect("declared");
    assert_eq!(tags.value, json!(["red", "blue"]));
    let active: Vec<_> = tags.options.iter().map(|option| option.active).collect();
    assert_eq!(active, vec![true, true, false]);
}

#[test]
fn select_filter_with_list_adds_each_item() {
    let fx = mounted();
    fx.registry
        .apply_filter("tags", vec!["red", "green"], Some(SELECT_FILTER_TYPE));

    assert_eq!(
        fx.registry.params()["tags"],
        ParamValue::from(vec!["red", "green"])
    );
}

#[test]
fn plain_filter_replaces_value() {
    let fx = mounted();
    fx.registry.apply_filter("status", "closed", None);

    assert_eq!(fx.registry.params()["status"], ParamValue::from("closed"));
}

#[test]
fn cleared_filter_is_inactive_and_omitted_from_url() {
    let fx = mounted();
    fx.registry.get_filter("status").expect("declared").clear();

    assert!(!fx.registry.is_filtering_by("status"));
    assert!(!fx.registry.store().url_params().contains_key("status"));
}

#[test]
fn clear_filters_and_reset() {
    let fx = mounted();
    fx.registry.apply_filter("tags", "red", Some(SELECT_FILTER_TYPE));
    assert_eq!(fx.registry.current_filters().len(), 2);

    fx.registry.clear_filters();
    assert!(!fx.registry.is_filtering());
    assert!(fx.registry.is_sorting());

    fx.registry.reset();
    assert!(!fx.registry.is_sorting());
}

#[test]
fn edits_in_one_tick_yield_one_navigation() {
    let fx = mounted();
    fx.registry.reset();
    fx.registry.apply_sort("email", Direction::Asc);
    fx.registry.apply_filter("status", "closed", None);
    fx.queue.run_until_idle();

    assert_eq!(fx.nav.visit_count(), 1);
    insta::assert_snapshot!(
        fx.nav.last_visit().expect("visited").url,
        @"https://app.test/users?order=asc&sort=email&status=closed"
    );
}

#[test]
fn custom_sort_keys_are_used() {
    let options = RefinementOptions {
        keys: SortKeys {
            sort: "s".to_string(),
            order: "o".to_string(),
        },
        ..RefinementOptions::default()
    };
    let fx = mounted_at("https://app.test/users?s=email&o=desc", options);

    assert!(fx.registry.is_sorting_by("email"));
    fx.registry.clear_sort();
    assert_eq!(fx.registry.params()["s"], ParamValue::Null);
}

// ===== Lifetime =====

#[test]
fn projection_is_noop_after_registry_drops() {
    let fx = mounted();
    let sort = fx.registry.get_sort("email").expect("declared");
    let tags = fx.registry.get_filter("tags").expect("declared");
    drop(fx.registry);

    sort.action();
    tags.action("red");
    fx.queue.run_until_idle();

    assert_eq!(fx.nav.visit_count(), 0);
}

#[test]
fn set_refiners_rebuilds_lookups() {
    let mut fx = mounted();
    fx.registry.set_refiners(Refiners {
        sorts: vec![sort("created", None)],
        filters: Vec::new(),
    });

    assert!(fx.registry.get_sort("name").is_none());
    assert!(fx.registry.get_sort("created").is_some());
    assert!(fx.registry.get_filter("status").is_none());
}
