//! tablestate
//!
//! URL-synchronized state for server-driven data tables: sort and filter
//! refinements kept in the query string, bulk row selection over paginated
//! results, and page actions dispatched through an injected navigator.
//!
//! The crate is single-threaded. A [`query::QueryParamStore`] owns a table's
//! params and batches synchronous edits into one navigation per tick through
//! a [`query::Scheduler`]; the managers in [`state`] build on it.
//!
//! ```
//! use std::rc::Rc;
//! use tablestate::navigation::MemoryNavigator;
//! use tablestate::query::{MicrotaskQueue, QueryContext};
//! use tablestate::state::{RefinementOptions, TableController};
//!
//! let nav = Rc::new(MemoryNavigator::new("https://app.test/users?sort=name&order=asc").unwrap());
//! let queue = MicrotaskQueue::new();
//! let context = QueryContext::new(nav.clone(), Rc::new(queue.clone()));
//!
//! let page = serde_json::json!({
//!     "users": {
//!         "recordKey": "id",
//!         "rows": [{"id": 1}],
//!         "refinements": {"sorts": [{"name": "name"}], "filters": []}
//!     }
//! });
//! let table = TableController::from_props(&page, "users", context, RefinementOptions::default())
//!     .unwrap();
//! table.mount();
//! queue.run_until_idle();
//!
//! assert!(table.is_sorting_by("name"));
//! table.clear_sort();
//! queue.run_until_idle();
//! assert_eq!(nav.location(), "https://app.test/users");
//! ```

pub mod config;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod query;
pub mod state;
