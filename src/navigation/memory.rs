//! In-memory navigator.
//!
//! Keeps a current location and records every visit instead of talking to a
//! server. GET visits move the location, so a store reading the URL back sees
//! what it last navigated to. Useful for headless hosts and tests.

use super::{HttpMethod, NavigationContext, VisitOptions};
use serde_json::Value;
use std::cell::RefCell;
use tracing::trace;
use url::Url;

/// A visit captured by [`MemoryNavigator`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedVisit {
    /// Absolute target URL.
    pub url: String,
    /// Request verb.
    pub method: HttpMethod,
    /// Request payload.
    pub data: Option<Value>,
    /// Whether scroll was preserved.
    pub preserve_scroll: bool,
    /// Whether state was preserved.
    pub preserve_state: bool,
    /// Restricted props.
    pub only: Vec<String>,
}

/// Navigator backed by an in-memory location.
#[derive(Debug)]
pub struct MemoryNavigator {
    location: RefCell<Url>,
    visits: RefCell<Vec<RecordedVisit>>,
}

impl MemoryNavigator {
    /// Start at an absolute `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if `location` is not an absolute URL.
    pub fn new(location: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            location: RefCell::new(Url::parse(location)?),
            visits: RefCell::new(Vec::new()),
        })
    }

    /// Full current location.
    pub fn location(&self) -> String {
        self.location.borrow().to_string()
    }

    /// Jump to `location` without recording a visit (e.g. back button).
    ///
    /// Relative locations resolve against the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if `location` cannot be resolved.
    pub fn set_location(&self, location: &str) -> Result<(), url::ParseError> {
        let resolved = self.location.borrow().join(location)?;
        *self.location.borrow_mut() = resolved;
        Ok(())
    }

    /// All visits so far, oldest first.
    pub fn visits(&self) -> Vec<RecordedVisit> {
        self.visits.borrow().clone()
    }

    /// Most recent visit.
    pub fn last_visit(&self) -> Option<RecordedVisit> {
        self.visits.borrow().last().cloned()
    }

    /// Number of visits so far.
    pub fn visit_count(&self) -> usize {
        self.visits.borrow().len()
    }
}

impl NavigationContext for MemoryNavigator {
    fn current_url(&self) -> String {
        let mut url = self.location.borrow().clone();
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }

    fn current_search(&self) -> String {
        self.location
            .borrow()
            .query()
            .filter(|query| !query.is_empty())
            .map(|query| format!("?{query}"))
            .unwrap_or_default()
    }

    fn visit(&self, url: &str, options: VisitOptions) {
        let resolved = self.location.borrow().join(url);
        let target = match resolved {
            Ok(target) => target,
            Err(err) => {
                trace!(url, error = %err, "rejecting visit to unresolvable url");
                if let Some(on_error) = &options.on_error {
                    on_error(&Value::String(err.to_string()));
                }
                if let Some(on_finish) = &options.on_finish {
                    on_finish();
                }
                return;
            }
        };

        trace!(url = %target, method = %options.method, "recording visit");
        self.visits.borrow_mut().push(RecordedVisit {
            url: target.to_string(),
            method: options.method,
            data: options.data.clone(),
            preserve_scroll: options.preserve_scroll,
            preserve_state: options.preserve_state,
            only: options.only.clone(),
        });

        if options.method == HttpMethod::Get {
            *self.location.borrow_mut() = target;
        }

        if let Some(on_success) = &options.on_success {
            on_success();
        }
        if let Some(on_finish) = &options.on_finish {
            on_finish();
        }
    }
}
