//! Runtime configuration.
//!
//! Resolution order: built-in defaults, then an optional JSON file named by
//! `TAGPRESS_CONFIG`, then individual `TAGPRESS_*` environment overrides. A
//! `.env` file in the working directory is loaded first when present.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_CONFIG_PATH: &str = "TAGPRESS_CONFIG";
pub const ENV_SERVER_URL: &str = "TAGPRESS_SERVER_URL";
pub const ENV_TIMEOUT_MS: &str = "TAGPRESS_TIMEOUT_MS";
pub const ENV_DEBOUNCE_MS: &str = "TAGPRESS_DEBOUNCE_MS";
pub const ENV_DEFAULT_TEMPLATE: &str = "TAGPRESS_DEFAULT_TEMPLATE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_server_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Quiet interval before a burst of edits turns into one preview request.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Template to select after loading the catalog. Falls back to the first
    /// template when absent or unknown.
    #[serde(default)]
    pub default_template: Option<String>,
}

impl EditorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            default_template: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl AppConfig {
    /// Load from `.env`, the optional config file, and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match non_empty(lookup(ENV_CONFIG_PATH)) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(url) = non_empty(lookup(ENV_SERVER_URL)) {
            config.server.base_url = url;
        }
        if let Some(raw) = non_empty(lookup(ENV_TIMEOUT_MS)) {
            config.server.timeout_ms = parse_millis(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_DEBOUNCE_MS)) {
            config.editor.debounce_ms = parse_millis(ENV_DEBOUNCE_MS, &raw)?;
        }
        if let Some(name) = non_empty(lookup(ENV_DEFAULT_TEMPLATE)) {
            config.editor.default_template = Some(name);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: ENV_SERVER_URL,
                message: "server url cannot be empty".to_string(),
            });
        }
        if self.server.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_TIMEOUT_MS,
                message: "timeout must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_millis(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        key,
        message: format!("expected milliseconds, got '{raw}': {error}"),
    })
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_debounce_ms() -> u64 {
    200
}
