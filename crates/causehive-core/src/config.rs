use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment override for `[api] base_url`.
pub const API_BASE_ENV: &str = "CAUSEHIVE_API_BASE";
/// Environment override for `[api] token`.
pub const API_TOKEN_ENV: &str = "CAUSEHIVE_API_TOKEN";
/// Environment override for `user_id`.
pub const USER_ENV: &str = "CAUSEHIVE_USER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Signed-in user; partitions search history. `None` means guest.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    /// Base URL without trailing slashes or a trailing `/api` segment.
    #[must_use]
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_history_display_limit")]
    pub history_display_limit: usize,
    /// Drop suggestion responses that arrive after a newer request was issued.
    #[serde(default = "default_true")]
    pub drop_stale_responses: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            max_suggestions: default_max_suggestions(),
            history_limit: default_history_limit(),
            history_display_limit: default_history_display_limit(),
            drop_stale_responses: default_true(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file for history and saved causes.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured path, or `<data_dir>/causehive/storage.sqlite3`.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(env::temp_dir)
                .join("causehive/storage.sqlite3")
        })
    }
}

/// Location of the user config file, if the platform has a config dir.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("causehive/config.toml"))
}

/// Load config from `path`; a missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ClientConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config (or defaults) and apply environment overrides.
///
/// # Errors
///
/// Returns an error if an existing config file is unreadable or invalid.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ClientConfig> {
    let config = match explicit.map(Path::to_path_buf).or_else(config_path) {
        Some(path) => load_config_from(&path)?,
        None => ClientConfig::default(),
    };
    Ok(apply_env_overrides(
        config,
        env::var(API_BASE_ENV).ok(),
        env::var(API_TOKEN_ENV).ok(),
        env::var(USER_ENV).ok(),
    ))
}

fn apply_env_overrides(
    mut config: ClientConfig,
    base_url: Option<String>,
    token: Option<String>,
    user: Option<String>,
) -> ClientConfig {
    let non_blank = |value: String| {
        let trimmed = value.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };
    if let Some(base_url) = base_url.and_then(non_blank) {
        config.api.base_url = base_url;
    }
    if let Some(token) = token.and_then(non_blank) {
        config.api.token = Some(token);
    }
    if let Some(user) = user.and_then(non_blank) {
        config.user_id = Some(user);
    }
    config
}

fn normalize_base_url(raw: &str) -> String {
    let mut base = raw.trim().trim_end_matches('/').to_string();
    if base.to_ascii_lowercase().ends_with("/api") {
        base.truncate(base.len() - "/api".len());
    }
    base.trim_end_matches('/').to_string()
}

const fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://www.causehive.tech".to_string()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_min_query_len() -> usize {
    2
}

const fn default_max_suggestions() -> usize {
    8
}

const fn default_history_limit() -> usize {
    10
}

const fn default_history_display_limit() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = load_config_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.search.debounce(), Duration::from_millis(300));
        assert_eq!(cfg.search.min_query_len, 2);
        assert_eq!(cfg.search.max_suggestions, 8);
        assert_eq!(cfg.search.history_limit, 10);
        assert_eq!(cfg.search.history_display_limit, 5);
        assert!(cfg.search.drop_stale_responses);
        assert!(cfg.user_id.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
user_id = "u-17"

[api]
base_url = "https://api.example.org/api/"

[search]
debounce_ms = 150
drop_stale_responses = false
"#,
        )
        .expect("write config");

        let cfg = load_config_from(&path).expect("load");
        assert_eq!(cfg.user_id.as_deref(), Some("u-17"));
        assert_eq!(cfg.api.normalized_base_url(), "https://api.example.org");
        assert_eq!(cfg.api.timeout_ms, 10_000);
        assert_eq!(cfg.search.debounce_ms, 150);
        assert_eq!(cfg.search.max_suggestions, 8);
        assert!(!cfg.search.drop_stale_responses);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndebounce_ms = \"soon\"\n").expect("write config");
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let cfg = apply_env_overrides(
            ClientConfig::default(),
            Some("http://localhost:8000/".to_string()),
            Some("  ".to_string()),
            Some("guest-7".to_string()),
        );
        assert_eq!(cfg.api.normalized_base_url(), "http://localhost:8000");
        assert!(cfg.api.token.is_none());
        assert_eq!(cfg.user_id.as_deref(), Some("guest-7"));
    }

    #[test]
    fn base_url_normalization() {
        assert_eq!(normalize_base_url("http://h.test///"), "http://h.test");
        assert_eq!(normalize_base_url("http://h.test/API"), "http://h.test");
        assert_eq!(normalize_base_url("/"), "");
        assert_eq!(normalize_base_url("http://h.test/apis"), "http://h.test/apis");
    }

    #[test]
    fn storage_path_prefers_explicit_value() {
        let storage = StorageConfig {
            path: Some(PathBuf::from("/tmp/hive.sqlite3")),
        };
        assert_eq!(storage.resolved_path(), PathBuf::from("/tmp/hive.sqlite3"));
        assert!(
            StorageConfig::default()
                .resolved_path()
                .ends_with("causehive/storage.sqlite3")
        );
    }
}
