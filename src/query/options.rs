//! Store configuration.

use super::codec::QueryMap;
use crate::model::ParamValue;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Query key that holds the page number. Always stripped on update.
pub const DEFAULT_PAGE_KEY: &str = "page";

/// Rewrites a param value before it is serialized.
pub type Transform = Rc<dyn Fn(&ParamValue) -> ParamValue>;

/// Per-key value transforms applied by `url_params`.
#[derive(Clone, Default)]
pub struct Transforms(HashMap<String, Transform>);

impl Transforms {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transform` for `key`, replacing any previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        transform: impl Fn(&ParamValue) -> ParamValue + 'static,
    ) {
        self.0.insert(key.into(), Rc::new(transform));
    }

    /// Transform registered for `key`.
    pub fn get(&self, key: &str) -> Option<&Transform> {
        self.0.get(key)
    }

    /// Whether no transforms are registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.0.keys().collect();
        keys.sort();
        f.debug_tuple("Transforms").field(&keys).finish()
    }
}

/// Options of a [`super::QueryParamStore`].
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Base URL of updates. `None` uses the navigator's current URL.
    pub url: Option<String>,
    /// Whether mutations propagate into navigation automatically.
    pub watch: bool,
    /// Page props reloaded on update. Empty reloads everything.
    pub only: Vec<String>,
    /// Keep scroll position across updates.
    pub preserve_scroll: bool,
    /// Keep local state across updates.
    pub preserve_state: bool,
    /// Pagination key stripped on every update.
    pub page_key: String,
    /// Static values overlaid on the URL at mount.
    pub defaults: QueryMap,
    /// Serialization transforms.
    pub transforms: Transforms,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            url: None,
            watch: true,
            only: Vec::new(),
            preserve_scroll: true,
            preserve_state: true,
            page_key: DEFAULT_PAGE_KEY.to_string(),
            defaults: QueryMap::new(),
            transforms: Transforms::new(),
        }
    }
}

impl QueryOptions {
    /// Use a fixed base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Enable or disable automatic propagation.
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Restrict reloads to these props.
    pub fn with_only<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = props.into_iter().map(Into::into).collect();
        self
    }

    /// Overlay a static value at mount.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Register a serialization transform.
    pub fn with_transform(
        mut self,
        key: impl Into<String>,
        transform: impl Fn(&ParamValue) -> ParamValue + 'static,
    ) -> Self {
        self.transforms.insert(key, transform);
        self
    }
}
