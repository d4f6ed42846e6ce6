//! Configuration schema for backlog
//!
//! Configuration is stored at `~/.config/backlog/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote data source settings
    pub source: SourceConfig,

    /// Local cache settings
    pub cache: CacheConfig,

    /// Maintainer-only operations
    pub maintenance: MaintenanceConfig,
}

impl Config {
    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<(), String> {
        let hours = self.cache.index_max_age_hours;
        if !hours.is_finite() || hours < 0.0 {
            return Err(format!(
                "cache.index_max_age_hours must be a non-negative number, got {}",
                hours
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err("source.timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Remote data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the static data tree (holds `index.json`, `scenes/`, `performers/`)
    pub base_url: String,

    /// GitHub API root used for the cheap "has the index changed" check
    pub api_url: String,

    /// `owner/repo` of the data repository
    pub repository: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://raw.githubusercontent.com/peolic/stashdb_backlog_data/main"
                .to_string(),
            api_url: "https://api.github.com".to_string(),
            repository: "peolic/stashdb_backlog_data".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Local cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the persisted stores (defaults to the platform state dir)
    pub state_dir: Option<PathBuf>,

    /// Hours before the index is re-checked against the remote source
    pub index_max_age_hours: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            index_max_age_hours: 1.0,
        }
    }
}

/// Maintainer gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Displayed names allowed to clear the cache and force refetches
    pub maintainers: Vec<String>,

    /// Displayed name of the current user
    pub identity: Option<String>,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            maintainers: vec!["peolic".to_string()],
            identity: None,
        }
    }
}
