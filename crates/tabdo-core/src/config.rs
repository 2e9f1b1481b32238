//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/tabdo/config.toml)
//! 3. Environment variables (TABDO_* prefix)
//!
//! Environment variables take precedence over config file values.
//!
//! ```toml
//! store_url = "https://jsonblob.com/api/jsonBlob"
//! default_list = "work"
//!
//! [[lists]]
//! name = "todo"
//! store_id = "1397236255732981760"
//!
//! [[lists]]
//! name = "work"
//! store_id = "1397236255732981761"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "TABDO";

/// Default remote store endpoint
pub const DEFAULT_STORE_URL: &str = "https://jsonblob.com/api/jsonBlob";

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// A list as it appears in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Human-readable list name (the tab label)
    pub name: String,
    /// Opaque document id in the remote store
    pub store_id: String,
}

impl ListConfig {
    pub fn new(name: impl Into<String>, store_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_id: store_id.into(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote list store
    #[serde(default = "default_store_url")]
    pub store_url: String,

    /// Selectable lists, in tab order
    #[serde(default = "default_lists")]
    pub lists: Vec<ListConfig>,

    /// List selected at session start (first list if unset)
    #[serde(default)]
    pub default_list: Option<String>,

    /// Per-request timeout for the remote store
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory for local files (debug log)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log file path (defaults to <data_dir>/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            lists: default_lists(),
            default_list: None,
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: default_data_dir(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (TABDO_STORE_URL, TABDO_DEFAULT_LIST, ...)
    /// 2. Config file (~/.config/tabdo/config.toml or TABDO_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load only what the file holds, without environment overrides
    ///
    /// Use this when the config is going to be written back, so overrides
    /// from the current environment don't end up in the file.
    pub fn load_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // TABDO_STORE_URL
        if let Ok(val) = std::env::var(format!("{}_STORE_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.store_url = val;
            }
        }

        // TABDO_DEFAULT_LIST
        if let Ok(val) = std::env::var(format!("{}_DEFAULT_LIST", ENV_PREFIX)) {
            self.default_list = if val.is_empty() { None } else { Some(val) };
        }

        // TABDO_REQUEST_TIMEOUT
        if let Ok(val) = std::env::var(format!("{}_REQUEST_TIMEOUT", ENV_PREFIX)) {
            if let Ok(secs) = val.trim().parse() {
                self.request_timeout_secs = secs;
            }
        }

        // TABDO_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with TABDO_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabdo")
            .join("config.toml")
    }

    /// Get the path of the debug log
    pub fn debug_log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_store_url() -> String {
    DEFAULT_STORE_URL.to_string()
}

fn default_lists() -> Vec<ListConfig> {
    vec![ListConfig::new("todo", "1397236255732981760")]
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabdo")
}
