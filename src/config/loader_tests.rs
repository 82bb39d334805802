//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// Removes an env var on creation and again on drop.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        Self(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(name);
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

// ===== Paths =====

#[test]
fn default_config_path_contains_tablestate_config_toml() {
    let Some(path) = default_config_path() else {
        return;
    };
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("tablestate") && path_str.ends_with("config.toml"),
        "Path should contain 'tablestate' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_tablestate_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("tablestate.log"),
        "Default log path should end with 'tablestate.log', got: {:?}",
        path
    );
}

// ===== Loading =====

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = write_temp(
        "tablestate_test_config.toml",
        r#"
log_file_path = "/tmp/tablestate-test.log"
log_filter = "tablestate=debug"

[query]
url = "https://app.test/users"
watch = false
only = ["users", "filters"]
preserve_scroll = false
page_key = "p"

[refinements]
sort_key = "s"
order_key = "o"
"#,
    );

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    let query = config.query.expect("query section");
    assert_eq!(query.url.as_deref(), Some("https://app.test/users"));
    assert_eq!(query.watch, Some(false));
    assert_eq!(
        query.only,
        Some(vec!["users".to_string(), "filters".to_string()])
    );
    assert_eq!(query.preserve_scroll, Some(false));
    assert_eq!(query.preserve_state, None);
    assert_eq!(query.page_key.as_deref(), Some("p"));

    let refinements = config.refinements.expect("refinements section");
    assert_eq!(refinements.sort_key.as_deref(), Some("s"));
    assert_eq!(refinements.order_key.as_deref(), Some("o"));
    assert_eq!(
        config.log_file_path,
        Some(PathBuf::from("/tmp/tablestate-test.log"))
    );
    assert_eq!(config.log_filter.as_deref(), Some("tablestate=debug"));

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = write_temp("tablestate_test_invalid.toml", "this is not valid TOML ][}{");

    match load_config_file(&config_path) {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str(
        r#"
[query]
watch = true
debounce = 300
"#,
    );
    assert!(result.is_err(), "Unknown keys should be rejected");
}

// ===== Merging =====

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.url, None);
    assert!(config.watch);
    assert!(config.only.is_empty());
    assert!(config.preserve_scroll);
    assert!(config.preserve_state);
    assert_eq!(config.page_key, "page");
    assert_eq!(config.sort_key, "sort");
    assert_eq!(config.order_key, "order");
    assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
}

#[test]
fn merge_config_uses_defaults_for_missing_fields() {
    let file = ConfigFile {
        query: Some(QuerySection {
            watch: Some(false),
            ..QuerySection::default()
        }),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file));
    assert!(!resolved.watch);
    assert!(resolved.preserve_state);
    assert_eq!(resolved.sort_key, "sort");
    assert_eq!(resolved.log_file_path, default_log_path());
}

#[test]
fn resolved_config_builds_store_and_registry_options() {
    let resolved = ResolvedConfig {
        url: Some("https://app.test/posts".to_string()),
        watch: false,
        only: vec!["posts".to_string()],
        page_key: "p".to_string(),
        sort_key: "s".to_string(),
        ..ResolvedConfig::default()
    };

    let query = resolved.query_options();
    assert_eq!(query.url.as_deref(), Some("https://app.test/posts"));
    assert!(!query.watch);
    assert_eq!(query.only, vec!["posts".to_string()]);
    assert_eq!(query.page_key, "p");
    assert!(query.defaults.is_empty());

    let refinements = resolved.refinement_options();
    assert_eq!(refinements.keys.sort, "s");
    assert_eq!(refinements.keys.order, "order");
    assert!(!refinements.query.watch);
}

// ===== Environment =====

#[test]
#[serial(tablestate_base_url)]
fn apply_env_overrides_respects_base_url() {
    let _guard = EnvGuard::new(BASE_URL_ENV_VAR);
    env::set_var(BASE_URL_ENV_VAR, "https://env.test/users");

    let result = apply_env_overrides(ResolvedConfig::default());
    assert_eq!(result.url.as_deref(), Some("https://env.test/users"));
}

#[test]
#[serial(tablestate_log)]
fn apply_env_overrides_respects_log_filter() {
    let _guard = EnvGuard::new(LOG_FILTER_ENV_VAR);
    env::set_var(LOG_FILTER_ENV_VAR, "tablestate::query=trace");

    let result = apply_env_overrides(ResolvedConfig::default());
    assert_eq!(result.log_filter, "tablestate::query=trace");
}

#[test]
#[serial(tablestate_base_url, tablestate_log)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(BASE_URL_ENV_VAR);
    let _log_guard = EnvGuard::new(LOG_FILTER_ENV_VAR);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(tablestate_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let explicit_path = write_temp(
        "tablestate_explicit.toml",
        "[query]\npage_key = \"explicit\"\n",
    );
    let env_path = write_temp("tablestate_env.toml", "[query]\npage_key = \"env\"\n");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .expect("valid config")
        .expect("config present");
    assert_eq!(
        config.query.and_then(|q| q.page_key).as_deref(),
        Some("explicit")
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(tablestate_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);
    let env_path = write_temp("tablestate_env_only.toml", "[refinements]\nsort_key = \"by\"\n");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = load_config_with_precedence(None)
        .expect("valid config")
        .expect("config present");
    assert_eq!(
        config.refinements.and_then(|r| r.sort_key).as_deref(),
        Some("by")
    );

    fs::remove_file(env_path).ok();
}

#[test]
#[serial(tablestate_config, tablestate_base_url)]
fn load_applies_full_precedence_chain() {
    let _config_guard = EnvGuard::new(CONFIG_ENV_VAR);
    let _url_guard = EnvGuard::new(BASE_URL_ENV_VAR);
    let path = write_temp(
        "tablestate_chain.toml",
        "[query]\nurl = \"https://file.test/\"\nwatch = false\n",
    );
    env::set_var(BASE_URL_ENV_VAR, "https://env.test/");

    let resolved = load(Some(path.clone())).expect("valid config");
    assert_eq!(resolved.url.as_deref(), Some("https://env.test/"));
    assert!(!resolved.watch, "file values survive env overrides");

    fs::remove_file(path).ok();
}
