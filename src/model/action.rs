//! Action descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP verb of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Lowercase verb name.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Patch => "patch",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action on a single row. Behavior is bound by the caller's UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineAction {
    /// Unique name.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: Value,
}

/// Action on the bulk selection. Behavior is bound by the caller's UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkAction {
    /// Unique name.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: Value,
}

/// Server route a page action submits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Verb of the request.
    pub method: HttpMethod,
    /// Target URL.
    pub route: String,
}

/// Action on the whole page, optionally backed by an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAction {
    /// Unique name.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Free-form provider metadata.
    #[serde(default)]
    pub metadata: Value,
    /// Whether `endpoint` is set.
    #[serde(default)]
    pub has_endpoint: bool,
    /// Route to submit to; `None` makes the action inert.
    #[serde(default)]
    pub endpoint: Option<Endpoint>,
}

/// All actions declared by a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actions {
    /// Row actions.
    #[serde(default)]
    pub inline: Vec<InlineAction>,
    /// Selection actions. A non-empty list enables bulk selection.
    #[serde(default)]
    pub bulk: Vec<BulkAction>,
    /// Page actions.
    #[serde(default)]
    pub page: Vec<PageAction>,
    /// Row action triggered by clicking a row.
    #[serde(default)]
    pub default: Option<InlineAction>,
}
