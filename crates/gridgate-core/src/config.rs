//! Configuration types for the Gridgate portal.
//!
//! Loaded from a single TOML file (`gridgate.toml` by default, or the
//! path in `GRIDGATE_CONFIG`). The shared secret can live in the file
//! directly or be pulled from an environment variable via
//! `shared_secret_env`.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),
}

/// Complete Gridgate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridgateConfig {
    /// Project name, shown in page titles.
    #[serde(default)]
    pub project: Option<String>,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Embedded widget settings (iframe endpoint + shared secret).
    #[serde(default)]
    pub widget: WidgetConfig,

    /// External user sync settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "127.0.0.1:8000".
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Externally visible base URL, used as the token origin field.
    /// Derived from the request Host header when unset.
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            public_url: None,
        }
    }
}

/// Settings for the embedded spreadsheet widget.
///
/// `webapp_url` doubles as the sync endpoint: the external web app
/// serves both the iframe UI and the `add_user` action. The URL may
/// carry query parameters meant only for the iframe use; the sync
/// client strips them before appending its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// URL of the external web app that renders the widget.
    #[serde(default)]
    pub webapp_url: String,

    /// Shared HMAC secret (or use `shared_secret_env`).
    #[serde(default)]
    pub shared_secret: Option<String>,

    /// Environment variable containing the shared secret.
    #[serde(default)]
    pub shared_secret_env: Option<String>,
}

impl WidgetConfig {
    /// Get the shared secret, checking `shared_secret_env` first.
    pub fn resolve_shared_secret(&self) -> Option<String> {
        if let Some(env_var) = &self.shared_secret_env {
            if let Ok(secret) = env::var(env_var) {
                return Some(secret);
            }
        }
        self.shared_secret.clone()
    }
}

/// External user sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Whether new registrations are mirrored to the external system.
    #[serde(default = "default_sync_enabled")]
    pub enabled: bool,

    /// Request timeout in seconds for the sync call.
    #[serde(default = "default_sync_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sync_enabled() -> bool {
    true
}

fn default_sync_timeout_secs() -> u64 {
    10
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_sync_enabled(),
            timeout_secs: default_sync_timeout_secs(),
        }
    }
}

/// Load configuration from the default location.
///
/// Uses `GRIDGATE_CONFIG` if set, otherwise `gridgate.toml` in the
/// working directory.
pub fn load_config() -> Result<GridgateConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration from an explicit path.
pub fn load_config_from(path: &PathBuf) -> Result<GridgateConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.display().to_string(),
        source: e,
    })?;
    let cfg: GridgateConfig = toml::from_str(&raw)?;
    Ok(cfg)
}

fn config_path() -> PathBuf {
    if let Ok(p) = env::var("GRIDGATE_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("gridgate.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GridgateConfig::default();
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
        assert!(cfg.sync.enabled);
        assert_eq!(cfg.sync.timeout_secs, 10);
        assert!(cfg.widget.webapp_url.is_empty());
    }

    #[test]
    fn test_parse_minimal() {
        let cfg: GridgateConfig = toml::from_str(
            r#"
            [widget]
            webapp_url = "https://script.example.com/exec?token=iframe"
            shared_secret = "s3cr3t"
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.widget.webapp_url,
            "https://script.example.com/exec?token=iframe"
        );
        assert_eq!(cfg.widget.resolve_shared_secret().unwrap(), "s3cr3t");
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_secret_env_takes_precedence() {
        std::env::set_var("GRIDGATE_TEST_SECRET", "from-env");
        let cfg = WidgetConfig {
            webapp_url: String::new(),
            shared_secret: Some("from-file".to_string()),
            shared_secret_env: Some("GRIDGATE_TEST_SECRET".to_string()),
        };
        assert_eq!(cfg.resolve_shared_secret().unwrap(), "from-env");
        std::env::remove_var("GRIDGATE_TEST_SECRET");
    }

    #[test]
    fn test_sync_overrides() {
        let cfg: GridgateConfig = toml::from_str(
            r#"
            [sync]
            enabled = false
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert!(!cfg.sync.enabled);
        assert_eq!(cfg.sync.timeout_secs, 3);
    }
}
