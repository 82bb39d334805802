//! Query-string codec with comma-joined arrays.
//!
//! A list value serializes as a single parameter whose elements are
//! percent-encoded individually and joined with a literal `,`. Parsing
//! reverses this by splitting every decoded value on `,`.
//!
//! Keys are emitted in sorted order so the same state always produces the
//! same URL.

use crate::model::ParamValue;
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Query parameters by key.
pub type QueryMap = BTreeMap<String, ParamValue>;

/// Separator between elements of a list value.
pub const ARRAY_SEPARATOR: char = ',';

/// Parse a query string into a mapping.
///
/// A leading `?` is ignored. Values containing a comma become lists; a
/// repeated key keeps its last value; pairs with an empty key are dropped.
pub fn parse(search: &str) -> QueryMap {
    let query = search.trim_start_matches(|c: char| matches!(c, '?' | '#' | '&'));

    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| {
            let value = if value.contains(ARRAY_SEPARATOR) {
                ParamValue::List(value.split(ARRAY_SEPARATOR).map(str::to_string).collect())
            } else {
                ParamValue::Text(value.into_owned())
            };
            (key.into_owned(), value)
        })
        .collect()
}

/// Serialize a mapping into a query string without the leading `?`.
///
/// Tombstones and empty lists are skipped; an empty text value serializes as
/// `key=`.
pub fn stringify(query: &QueryMap) -> String {
    query
        .iter()
        .filter_map(|(key, value)| {
            let encoded = match value {
                ParamValue::Null => return None,
                ParamValue::List(items) if items.is_empty() => return None,
                ParamValue::Text(text) => urlencoding::encode(text).into_owned(),
                ParamValue::List(items) => items
                    .iter()
                    .map(|item| urlencoding::encode(item).into_owned())
                    .collect::<Vec<_>>()
                    .join(&ARRAY_SEPARATOR.to_string()),
            };
            Some(format!("{}={}", urlencoding::encode(key), encoded))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Merge `query` into the query string already on `url`.
///
/// Keys in `query` override the URL's own keys, keys in `strip` are removed
/// from the result, and any `#fragment` is kept.
pub fn stringify_url(url: &str, query: &QueryMap, strip: &[&str]) -> String {
    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let (base, existing) = match without_fragment.split_once('?') {
        Some((base, existing)) => (base, existing),
        None => (without_fragment, ""),
    };

    let mut merged = parse(existing);
    merged.extend(query.iter().map(|(key, value)| (key.clone(), value.clone())));
    for key in strip {
        merged.remove(*key);
    }

    let mut out = base.to_string();
    let serialized = stringify(&merged);
    if !serialized.is_empty() {
        out.push('?');
        out.push_str(&serialized);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
