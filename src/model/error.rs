//! Error types for tablestate.
//!
//! The state managers themselves are total: unknown refinement names resolve
//! to `None`, inert page actions are no-ops, and navigation failures belong to
//! the navigator. Errors only arise at the edges, when a table descriptor is
//! pulled out of page data.
//!
//! # Error Hierarchy
//!
//! - [`TableError`] - building a controller from page data
//! - [`crate::config::ConfigError`] - loading the TOML configuration
//! - [`crate::logging::LoggingError`] - installing the tracing subscriber

use thiserror::Error;

/// Failure to build a table controller from page data.
#[derive(Debug, Error)]
pub enum TableError {
    /// No value exists at the given dotted path.
    ///
    /// The page did not share a table under this name. Callers that want to
    /// degrade to an empty table can match on this variant.
    #[error("No table props at path {path:?}")]
    MissingProps {
        /// Dotted path that was resolved.
        path: String,
    },

    /// The value at the path is not a table descriptor.
    #[error("Invalid table descriptor at {path:?}: {source}")]
    InvalidDescriptor {
        /// Dotted path that was resolved.
        path: String,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_props_names_the_path() {
        let err = TableError::MissingProps {
            path: "users.table".to_string(),
        };
        assert_eq!(err.to_string(), "No table props at path \"users.table\"");
    }

    #[test]
    fn invalid_descriptor_exposes_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TableError::InvalidDescriptor {
            path: "table".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
