//! Configuration loading and management
//!
//! Handles parsing of the `config.toml` file and resolving where task data
//! lives.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::storage::{DEFAULT_QUOTA_BYTES, DEFAULT_STORAGE_KEY};
use crate::view::Filter;

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Fallback data directory when no platform directory is available
pub const FALLBACK_DATA_DIR: &str = ".todo";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Listing configuration
    #[serde(default)]
    pub view: ViewConfig,
}

/// Where and how the task collection is stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory (defaults to the platform data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Key the collection is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// Maximum stored size in bytes
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,

    /// How long to wait for a contended lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_quota_bytes() -> u64 {
    DEFAULT_QUOTA_BYTES
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
            quota_bytes: default_quota_bytes(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Listing defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Filter used by `todo list` when none is given
    #[serde(default)]
    pub default_filter: Filter,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "todo")
}

/// Default config file location (`<platform config dir>/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return defaults
    ///
    /// A missing or invalid file yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the data directory
    ///
    /// Precedence: explicit override, `storage.dir`, platform data dir,
    /// then `./.todo`.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Some(dir) = &self.storage.dir {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(Error::InvalidConfig(format!(
                "storage.key '{key}' may only contain letters, digits, '-' and '_'"
            )));
        }
        if self.quota_bytes == 0 {
            return Err(Error::InvalidConfig(
                "storage.quota_bytes must be > 0".to_string(),
            ));
        }
        if self.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
