//! Page data lookup by dotted path.

use serde_json::Value;

/// Reads nested values out of page data.
///
/// A path that does not exist resolves to `None`; callers degrade to empty
/// behavior rather than failing.
pub trait PropertyResolver {
    /// Value at `path`, where segments are separated by `.`.
    fn resolve(&self, path: &str) -> Option<Value>;
}

impl PropertyResolver for Value {
    fn resolve(&self, path: &str) -> Option<Value> {
        path.split('.')
            .try_fold(self, |node, segment| match node {
                Value::Object(fields) => fields.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            })
            .cloned()
    }
}
