//! Navigation collaborators.
//!
//! The state managers never touch a browser directly. Reading the current
//! location and issuing server round-trips goes through a
//! [`NavigationContext`] injected at construction, and page data is read
//! through a [`PropertyResolver`].

pub mod memory;
pub mod props;

pub use crate::model::HttpMethod;
pub use memory::{MemoryNavigator, RecordedVisit};
pub use props::PropertyResolver;

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Callback run on visit success or completion.
pub type VisitCallback = Rc<dyn Fn()>;

/// Callback receiving the error bag of a failed visit.
pub type VisitErrorCallback = Rc<dyn Fn(&Value)>;

// ===== VisitOptions =====

/// Options of a single navigation request.
#[derive(Clone, Default)]
pub struct VisitOptions {
    /// Request verb.
    pub method: HttpMethod,
    /// Request payload for verbs that carry a body.
    pub data: Option<Value>,
    /// Keep the scroll position after the round-trip.
    pub preserve_scroll: bool,
    /// Keep local component state after the round-trip.
    pub preserve_state: bool,
    /// Restrict the reload to these page props. Empty reloads everything.
    pub only: Vec<String>,
    /// Run when the server accepted the request.
    pub on_success: Option<VisitCallback>,
    /// Run with the error bag when the server rejected the request.
    pub on_error: Option<VisitErrorCallback>,
    /// Run after success or error.
    pub on_finish: Option<VisitCallback>,
}

impl VisitOptions {
    /// Options used for refinement reloads: keep scroll and state.
    pub fn preserving() -> Self {
        Self {
            preserve_scroll: true,
            preserve_state: true,
            ..Self::default()
        }
    }

    /// Set the verb.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Restrict the reload to the given props.
    pub fn with_only<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = props.into_iter().map(Into::into).collect();
        self
    }

    /// Set the success callback.
    pub fn on_success(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_success = Some(Rc::new(callback));
        self
    }

    /// Set the error callback.
    pub fn on_error(mut self, callback: impl Fn(&Value) + 'static) -> Self {
        self.on_error = Some(Rc::new(callback));
        self
    }

    /// Set the completion callback.
    pub fn on_finish(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_finish = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for VisitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitOptions")
            .field("method", &self.method)
            .field("data", &self.data)
            .field("preserve_scroll", &self.preserve_scroll)
            .field("preserve_state", &self.preserve_state)
            .field("only", &self.only)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

// ===== NavigationContext =====

/// Access to the current location and the server-driven router.
///
/// Implementations perform the round-trip that re-renders the page with
/// updated data. Failures are reported through the visit's callbacks; the
/// state managers never retry or roll back.
pub trait NavigationContext {
    /// Current URL without query string or fragment.
    fn current_url(&self) -> String;

    /// Current query string, including the leading `?` when non-empty.
    fn current_search(&self) -> String;

    /// Navigate to `url`.
    fn visit(&self, url: &str, options: VisitOptions);

    /// GET `url`.
    fn get(&self, url: &str, options: VisitOptions) {
        self.visit(url, options.with_method(HttpMethod::Get));
    }

    /// POST `data` to `url`.
    fn post(&self, url: &str, data: Value, options: VisitOptions) {
        self.visit(url, options.with_method(HttpMethod::Post).with_data(data));
    }

    /// PUT `data` to `url`.
    fn put(&self, url: &str, data: Value, options: VisitOptions) {
        self.visit(url, options.with_method(HttpMethod::Put).with_data(data));
    }

    /// PATCH `data` to `url`.
    fn patch(&self, url: &str, data: Value, options: VisitOptions) {
        self.visit(url, options.with_method(HttpMethod::Patch).with_data(data));
    }

    /// DELETE `url`. Never carries a body.
    fn delete(&self, url: &str, options: VisitOptions) {
        let options = VisitOptions {
            data: None,
            ..options.with_method(HttpMethod::Delete)
        };
        self.visit(url, options);
    }
}
