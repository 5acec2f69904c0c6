//! Layered configuration for the scholar CLI
//!
//! Priority: environment (`SCHOLAR_`, `__`-separated path) over the TOML
//! config file over built-in defaults.

use crate::paths;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use scholar_core::cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DAY_SECS: u64 = 24 * 60 * 60;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CacheSettings {
    /// Cache database location; the platform data dir when unset
    pub db_path: Option<PathBuf>,
    /// Agent behavior document used for fingerprinting
    pub agents_doc: PathBuf,
    /// Task behavior document used for fingerprinting
    pub tasks_doc: PathBuf,
    /// TTL in days for analysis entries; 0 means no expiration
    pub analysis_ttl_days: u64,
    /// TTL in days for full-result entries; 0 means no expiration
    pub full_ttl_days: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            db_path: None,
            agents_doc: PathBuf::from("config/agents.yaml"),
            tasks_doc: PathBuf::from("config/tasks.yaml"),
            analysis_ttl_days: 30,
            full_ttl_days: 7,
        }
    }
}

impl CacheSettings {
    /// Effective database path
    pub fn database_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(paths::get_database_path)
    }

    /// Convert to the core cache configuration
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_docs(self.agents_doc.clone(), self.tasks_doc.clone())
            .with_ttls(days_to_ttl(self.analysis_ttl_days), days_to_ttl(self.full_ttl_days))
    }
}

/// A configured 0 disables expiration
fn days_to_ttl(days: u64) -> Option<Duration> {
    (days > 0).then(|| Duration::from_secs(days * DAY_SECS))
}

/// Configuration manager handling the layered load
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a manager over the default config file location
    pub fn new() -> Self {
        Self {
            config_path: paths::get_config_path(),
        }
    }

    /// Create a manager over a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment = figment.merge(Env::prefixed("SCHOLAR_").split("__"));

        figment.extract().context("Failed to load configuration")
    }
}

/// Load the effective configuration from the default locations
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}
