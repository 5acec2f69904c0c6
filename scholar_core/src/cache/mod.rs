//! Result caching with config-based invalidation
//!
//! Discovery runs are expensive, so analysis results are cached in a
//! persistent key-value store. Cache keys incorporate a fingerprint of
//! the agent and task behavior documents: any edit to either document
//! changes the fingerprint and logically invalidates every prior entry.
//!
//! Two granularities are kept separately. `analysis` holds course/book
//! understanding (stable, long TTL); `full` holds the complete resource
//! list (volatile, short TTL). Both TTLs are injected through
//! [`CacheConfig`], so the cache is fully unit-testable.
//!
//! The cache is advisory: every storage failure is swallowed at the
//! [`service::ResultCache`] boundary and treated as a miss or a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub mod fingerprint;
pub mod key;
pub mod memory_store;
pub mod service;
pub mod sqlite_store;
pub mod traits;

pub use memory_store::MemoryStore;
pub use service::ResultCache;
pub use sqlite_store::SqliteCacheStore;
pub use traits::CacheStore;

/// Cache entry granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// Course/book understanding only (textbook identification)
    Analysis,
    /// Complete discovery results including the resource list
    Full,
}

impl CacheType {
    /// Stable label used in storage keys and rows
    pub fn label(&self) -> &'static str {
        match self {
            CacheType::Analysis => "analysis",
            CacheType::Full => "full",
        }
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CacheType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analysis" => Ok(CacheType::Analysis),
            "full" => Ok(CacheType::Full),
            other => Err(crate::error::Error::storage(format!(
                "unknown cache type: {other}"
            ))),
        }
    }
}

/// Persisted cache record, keyed by `cache_key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub cache_key: String,
    pub config_fingerprint: String,
    pub cache_type: CacheType,
    /// Original request snapshot, stored for auditing only
    pub inputs: Value,
    /// Opaque results payload
    pub results: Value,
    pub cached_at: DateTime<Utc>,
}

/// Read-only cache counts for observability
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheSummary {
    pub total_entries: u64,
    pub valid_entries: u64,
    pub stale_entries: u64,
    pub config_fingerprint: String,
}

/// Cache behavior configuration.
///
/// Passed into [`ResultCache`] explicitly; nothing here is read from
/// global state. A `None` TTL means entries of that type never expire.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Agent behavior document, first fingerprint input
    pub agents_doc: PathBuf,
    /// Task behavior document, second fingerprint input
    pub tasks_doc: PathBuf,
    /// TTL for `analysis` entries, default 30 days
    pub analysis_ttl: Option<Duration>,
    /// TTL for `full` entries, default 7 days
    pub full_ttl: Option<Duration>,
}

const DAY_SECS: u64 = 24 * 60 * 60;

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            agents_doc: PathBuf::from("config/agents.yaml"),
            tasks_doc: PathBuf::from("config/tasks.yaml"),
            analysis_ttl: Some(Duration::from_secs(30 * DAY_SECS)),
            full_ttl: Some(Duration::from_secs(7 * DAY_SECS)),
        }
    }
}

impl CacheConfig {
    /// Configure the behavior document locations
    pub fn with_docs(mut self, agents_doc: impl Into<PathBuf>, tasks_doc: impl Into<PathBuf>) -> Self {
        self.agents_doc = agents_doc.into();
        self.tasks_doc = tasks_doc.into();
        self
    }

    /// Configure both TTLs; `None` disables expiration
    pub fn with_ttls(mut self, analysis_ttl: Option<Duration>, full_ttl: Option<Duration>) -> Self {
        self.analysis_ttl = analysis_ttl;
        self.full_ttl = full_ttl;
        self
    }

    /// TTL configured for the given cache type
    pub fn ttl_for(&self, cache_type: CacheType) -> Option<Duration> {
        match cache_type {
            CacheType::Analysis => self.analysis_ttl,
            CacheType::Full => self.full_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_type_labels_round_trip() {
        assert_eq!(CacheType::Analysis.label(), "analysis");
        assert_eq!(CacheType::Full.label(), "full");
        assert_eq!("analysis".parse::<CacheType>().unwrap(), CacheType::Analysis);
        assert_eq!("full".parse::<CacheType>().unwrap(), CacheType::Full);
        assert!("partial".parse::<CacheType>().is_err());
    }

    #[test]
    fn test_default_ttls() {
        let config = CacheConfig::default();

        assert_eq!(
            config.ttl_for(CacheType::Analysis),
            Some(Duration::from_secs(30 * DAY_SECS))
        );
        assert_eq!(
            config.ttl_for(CacheType::Full),
            Some(Duration::from_secs(7 * DAY_SECS))
        );
    }

    #[test]
    fn test_ttl_can_be_disabled() {
        let config = CacheConfig::default().with_ttls(None, None);

        assert_eq!(config.ttl_for(CacheType::Analysis), None);
        assert_eq!(config.ttl_for(CacheType::Full), None);
    }
}
