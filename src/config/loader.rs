//! Configuration file loading with precedence handling.

use crate::query::{QueryOptions, DEFAULT_PAGE_KEY};
use crate::state::refinements::{
    RefinementOptions, SortKeys, DEFAULT_ORDER_KEY, DEFAULT_SORT_KEY,
};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "TABLESTATE_CONFIG";

/// Environment variable overriding `query.url`.
pub const BASE_URL_ENV_VAR: &str = "TABLESTATE_BASE_URL";

/// Environment variable overriding `log_filter`.
pub const LOG_FILTER_ENV_VAR: &str = "TABLESTATE_LOG";

/// Log directives used when neither the file nor the environment sets one.
pub const DEFAULT_LOG_FILTER: &str = "tablestate=info";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/tablestate/config.toml`:
///
/// ```toml
/// log_file_path = "/tmp/tablestate.log"
/// log_filter = "tablestate=debug"
///
/// [query]
/// url = "https://app.test/users"
/// watch = true
/// only = ["users"]
/// page_key = "page"
///
/// [refinements]
/// sort_key = "sort"
/// order_key = "order"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Query store settings.
    #[serde(default)]
    pub query: Option<QuerySection>,

    /// Refinement key names.
    #[serde(default)]
    pub refinements: Option<RefinementsSection>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// `EnvFilter` directives for the log file.
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// `[query]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QuerySection {
    /// Fixed base URL for updates.
    #[serde(default)]
    pub url: Option<String>,
    /// Propagate mutations automatically.
    #[serde(default)]
    pub watch: Option<bool>,
    /// Props to reload on update.
    #[serde(default)]
    pub only: Option<Vec<String>>,
    /// Keep scroll position across updates.
    #[serde(default)]
    pub preserve_scroll: Option<bool>,
    /// Keep local state across updates.
    #[serde(default)]
    pub preserve_state: Option<bool>,
    /// Pagination key stripped on update.
    #[serde(default)]
    pub page_key: Option<String>,
}

/// `[refinements]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RefinementsSection {
    /// Key holding the sort name.
    #[serde(default)]
    pub sort_key: Option<String>,
    /// Key holding the sort direction.
    #[serde(default)]
    pub order_key: Option<String>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file and env vars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Fixed base URL, if any.
    pub url: Option<String>,
    /// Automatic propagation.
    pub watch: bool,
    /// Props to reload on update.
    pub only: Vec<String>,
    /// Keep scroll position.
    pub preserve_scroll: bool,
    /// Keep local state.
    pub preserve_state: bool,
    /// Pagination key.
    pub page_key: String,
    /// Sort name key.
    pub sort_key: String,
    /// Sort direction key.
    pub order_key: String,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// `EnvFilter` directives for the log file.
    pub log_filter: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            url: None,
            watch: true,
            only: Vec::new(),
            preserve_scroll: true,
            preserve_state: true,
            page_key: DEFAULT_PAGE_KEY.to_string(),
            sort_key: DEFAULT_SORT_KEY.to_string(),
            order_key: DEFAULT_ORDER_KEY.to_string(),
            log_file_path: default_log_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Store options described by this config.
    ///
    /// Defaults and transforms are code-level concerns and start empty.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            url: self.url.clone(),
            watch: self.watch,
            only: self.only.clone(),
            preserve_scroll: self.preserve_scroll,
            preserve_state: self.preserve_state,
            page_key: self.page_key.clone(),
            ..QueryOptions::default()
        }
    }

    /// Registry options described by this config.
    pub fn refinement_options(&self) -> RefinementOptions {
        RefinementOptions {
            query: self.query_options(),
            keys: SortKeys {
                sort: self.sort_key.clone(),
                order: self.order_key.clone(),
            },
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/tablestate/tablestate.log` on Linux, or the
/// platform equivalent. Falls back to the current directory when no state
/// directory exists.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("tablestate").join("tablestate.log"),
        None => PathBuf::from("tablestate.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), "loaded config file");
    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/tablestate/config.toml` on Linux, appropriate path on
/// other platforms. Returns `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tablestate").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument
/// 2. `TABLESTATE_CONFIG` environment variable
/// 3. Default path `~/.config/tablestate/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for `TABLESTATE_BASE_URL`, which overrides `query.url`, and
/// `TABLESTATE_LOG`, which overrides `log_filter`.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(url) = std::env::var(BASE_URL_ENV_VAR) {
        config.url = Some(url);
    }
    if let Ok(filter) = std::env::var(LOG_FILTER_ENV_VAR) {
        debug!(filter = %filter, "log filter overridden from environment");
        config.log_filter = filter;
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };
    let query = config.query.unwrap_or_default();
    let refinements = config.refinements.unwrap_or_default();

    ResolvedConfig {
        url: query.url.or(defaults.url),
        watch: query.watch.unwrap_or(defaults.watch),
        only: query.only.unwrap_or(defaults.only),
        preserve_scroll: query.preserve_scroll.unwrap_or(defaults.preserve_scroll),
        preserve_state: query.preserve_state.unwrap_or(defaults.preserve_state),
        page_key: query.page_key.unwrap_or(defaults.page_key),
        sort_key: refinements.sort_key.unwrap_or(defaults.sort_key),
        order_key: refinements.order_key.unwrap_or(defaults.order_key),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        log_filter: config.log_filter.unwrap_or(defaults.log_filter),
    }
}

/// Load, merge and apply env overrides in one step.
///
/// Precedence chain: Defaults → Config File → Env Vars (highest).
///
/// # Errors
///
/// Returns error if a config file exists but cannot be read or parsed.
pub fn load(config_path: Option<PathBuf>) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    Ok(apply_env_overrides(merge_config(file)))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
