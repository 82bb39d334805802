//! Query parameter store.
//!
//! Owns the params mapping of one table and keeps it in step with the URL:
//! hydrates from the current query string, serializes back on update, and
//! batches mutations so a tick of synchronous edits produces one navigation.

use super::codec::{self, QueryMap};
use super::dispatcher::{Dispatcher, SubscriptionId};
use super::options::QueryOptions;
use super::scheduler::Scheduler;
use crate::model::ParamValue;
use crate::navigation::{NavigationContext, VisitOptions};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

// ===== QueryContext =====

/// Collaborators a store is threaded through.
#[derive(Clone)]
pub struct QueryContext {
    /// Location access and router.
    pub navigator: Rc<dyn NavigationContext>,
    /// Next-tick scheduling.
    pub scheduler: Rc<dyn Scheduler>,
}

impl QueryContext {
    /// Bundle a navigator and a scheduler.
    pub fn new(navigator: Rc<dyn NavigationContext>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            navigator,
            scheduler,
        }
    }
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext").finish_non_exhaustive()
    }
}

// ===== StoreState =====

#[derive(Debug, Default)]
struct StoreState {
    params: QueryMap,
    dispatcher: Dispatcher,
    flush_scheduled: bool,
}

/// Notify listeners of the settled params. Runs on the scheduler.
fn flush(state: &RefCell<StoreState>) {
    let (listeners, params) = {
        let mut state = state.borrow_mut();
        state.flush_scheduled = false;
        if !state.dispatcher.is_armed() {
            return;
        }
        (state.dispatcher.listeners(), state.params.clone())
    };

    trace!(listeners = listeners.len(), "flushing query params");
    for listener in listeners {
        listener(&params);
    }
}

// ===== QueryParamStore =====

/// Shared handle to a table's query params.
///
/// Cloning yields another handle to the same store. The store lives as long
/// as any strong handle; [`WeakQueryParamStore`] handles do not keep it alive.
#[derive(Clone)]
pub struct QueryParamStore {
    state: Rc<RefCell<StoreState>>,
    context: QueryContext,
    options: Rc<QueryOptions>,
}

impl QueryParamStore {
    /// Create an empty store.
    ///
    /// Nothing is read from the URL until [`QueryParamStore::mount`]. With
    /// `watch` enabled, the store subscribes its own [`QueryParamStore::update`]
    /// so every settled batch of mutations navigates.
    pub fn new(context: QueryContext, options: QueryOptions) -> Self {
        let store = Self {
            state: Rc::new(RefCell::new(StoreState::default())),
            context,
            options: Rc::new(options),
        };

        if store.options.watch {
            let weak = store.downgrade();
            store.subscribe(move |_| {
                if let Some(store) = weak.upgrade() {
                    store.update();
                }
            });
        }

        store
    }

    /// Options the store was built with.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Collaborators the store uses.
    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// Non-owning handle.
    pub fn downgrade(&self) -> WeakQueryParamStore {
        WeakQueryParamStore {
            state: Rc::downgrade(&self.state),
            context: self.context.clone(),
            options: Rc::clone(&self.options),
        }
    }

    // ----- Reads -----

    /// Snapshot of all params, tombstones included.
    pub fn params(&self) -> QueryMap {
        self.state.borrow().params.clone()
    }

    /// Current value of `key`.
    pub fn value(&self, key: &str) -> Option<ParamValue> {
        self.state.borrow().params.get(key).cloned()
    }

    /// Whether `key` is known, tombstoned or not.
    pub fn contains(&self, key: &str) -> bool {
        self.state.borrow().params.contains_key(key)
    }

    /// Parse the current URL's query string.
    ///
    /// Independent of the in-memory params; used for hydration.
    pub fn get(&self) -> QueryMap {
        codec::parse(&self.context.navigator.current_search())
    }

    /// Mapping that [`QueryParamStore::update`] serializes.
    ///
    /// Keys with a registered transform are transformed, whatever their value.
    /// Other keys are omitted when empty.
    pub fn url_params(&self) -> QueryMap {
        let state = self.state.borrow();
        state
            .params
            .iter()
            .filter_map(|(key, value)| match self.options.transforms.get(key) {
                Some(transform) => Some((key.clone(), transform(value))),
                None if value.is_empty() => None,
                None => Some((key.clone(), value.clone())),
            })
            .collect()
    }

    // ----- Mutations -----

    /// Write `value` under `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        trace!(key = %key, value = %value, "set query param");
        self.state.borrow_mut().params.insert(key, value);
        self.touch();
    }

    /// Append `value` to the list under `key`.
    ///
    /// A key that does not hold a list is replaced by a one-element list.
    pub fn add(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        trace!(key = %key, value = %value, "add query param");
        {
            let mut state = self.state.borrow_mut();
            let params = &mut state.params;
            if let Some(ParamValue::List(items)) = params.get_mut(&key) {
                items.push(value);
            } else {
                params.insert(key, ParamValue::List(vec![value]));
            }
        }
        self.touch();
    }

    /// Tombstone `key`.
    pub fn clear(&self, key: impl Into<String>) {
        let key = key.into();
        trace!(key = %key, "clear query param");
        self.state.borrow_mut().params.insert(key, ParamValue::Null);
        self.touch();
    }

    /// Apply several writes as one mutation.
    pub fn extend<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.state.borrow_mut().params.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self.touch();
    }

    /// Replace params with the current URL's query, dropping unsynced edits.
    pub fn reset(&self) {
        let params = self.get();
        debug!(keys = params.len(), "resetting query params from url");
        self.state.borrow_mut().params = params;
        self.touch();
    }

    // ----- Propagation -----

    /// Navigate to the base URL carrying the current params.
    ///
    /// The page key is always stripped: changing refinements restarts
    /// pagination. Returns the URL that was visited.
    pub fn update(&self) -> String {
        let base = self
            .options
            .url
            .clone()
            .unwrap_or_else(|| self.context.navigator.current_url());
        let url = codec::stringify_url(&base, &self.url_params(), &[self.options.page_key.as_str()]);

        debug!(url = %url, "navigating with refined query");
        let options = VisitOptions {
            preserve_scroll: self.options.preserve_scroll,
            preserve_state: self.options.preserve_state,
            only: self.options.only.clone(),
            ..VisitOptions::default()
        };
        self.context.navigator.visit(&url, options);
        url
    }

    /// Stop mutations from notifying subscribers.
    pub fn pause(&self) {
        trace!("pausing query observation");
        self.state.borrow_mut().dispatcher.disarm();
    }

    /// Resume notifications. Mutations made while paused are not replayed.
    pub fn resume(&self) {
        trace!("resuming query observation");
        self.state.borrow_mut().dispatcher.arm();
    }

    /// Whether mutations currently notify.
    pub fn is_paused(&self) -> bool {
        !self.state.borrow().dispatcher.is_armed()
    }

    /// Register a listener called once per settled batch of mutations.
    ///
    /// Listeners fire whether or not the store watches; `watch` only decides
    /// whether the store's own [`QueryParamStore::update`] is one of them.
    /// Nothing fires while paused, including between [`QueryParamStore::mount`]
    /// and the next tick.
    pub fn subscribe(&self, listener: impl Fn(&QueryMap) + 'static) -> SubscriptionId {
        self.state
            .borrow_mut()
            .dispatcher
            .subscribe(Rc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.borrow_mut().dispatcher.unsubscribe(id)
    }

    /// Hydrate from the URL without navigating.
    ///
    /// Observation is paused, params are merged with the URL's query and then
    /// the static defaults, and observation resumes on the next tick.
    /// Hydration itself never notifies or navigates.
    pub fn mount(&self) {
        self.pause();
        let mut hydrated = self.get();
        hydrated.extend(
            self.options
                .defaults
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        debug!(keys = hydrated.len(), "hydrated query params");
        self.state.borrow_mut().params.extend(hydrated);
        self.resume_next_tick();
    }

    /// Re-arm observation on the next tick.
    pub(crate) fn resume_next_tick(&self) {
        let state = Rc::downgrade(&self.state);
        self.context.scheduler.schedule(Box::new(move || {
            if let Some(state) = state.upgrade() {
                trace!("resuming query observation after mount");
                state.borrow_mut().dispatcher.arm();
            }
        }));
    }

    /// Schedule one flush for the current batch if armed.
    fn touch(&self) {
        let schedule = {
            let mut state = self.state.borrow_mut();
            if state.dispatcher.is_armed() && !state.flush_scheduled {
                state.flush_scheduled = true;
                true
            } else {
                false
            }
        };

        if schedule {
            let state: Weak<RefCell<StoreState>> = Rc::downgrade(&self.state);
            self.context.scheduler.schedule(Box::new(move || {
                if let Some(state) = state.upgrade() {
                    flush(&state);
                }
            }));
        }
    }
}

impl fmt::Debug for QueryParamStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("QueryParamStore")
            .field("params", &state.params)
            .field("dispatcher", &state.dispatcher)
            .field("options", &self.options)
            .finish()
    }
}

// ===== WeakQueryParamStore =====

/// Non-owning handle held by actionable projections.
#[derive(Clone)]
pub struct WeakQueryParamStore {
    state: Weak<RefCell<StoreState>>,
    context: QueryContext,
    options: Rc<QueryOptions>,
}

impl WeakQueryParamStore {
    /// Strong handle, if the store is still alive.
    pub fn upgrade(&self) -> Option<QueryParamStore> {
        self.state.upgrade().map(|state| QueryParamStore {
            state,
            context: self.context.clone(),
            options: Rc::clone(&self.options),
        })
    }
}

impl fmt::Debug for WeakQueryParamStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakQueryParamStore")
            .field("alive", &(self.state.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
