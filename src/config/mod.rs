//! Configuration module.
//!
//! Store and registry defaults can be set from a TOML file so hosts don't
//! have to thread them through code. See [`loader`] for precedence rules.

pub mod loader;

pub use loader::{
    apply_env_overrides, default_config_path, default_log_path, load, load_config_file,
    load_config_with_precedence, merge_config, ConfigError, ConfigFile, QuerySection,
    RefinementsSection, ResolvedConfig, BASE_URL_ENV_VAR, CONFIG_ENV_VAR, DEFAULT_LOG_FILTER,
    LOG_FILTER_ENV_VAR,
};
