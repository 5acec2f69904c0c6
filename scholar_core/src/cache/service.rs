//! Result cache service
//!
//! Config-aware, TTL-aware get/put/purge over a [`CacheStore`]. The
//! cache is advisory only: the public operations are infallible. Every
//! storage error funnels through one adapter ([`fail_open`]) that logs a
//! warning and substitutes the operation's miss/no-op value, so a broken
//! store can never abort a discovery run.

use crate::cache::fingerprint::compute_fingerprint;
use crate::cache::key::{build_key, storage_key};
use crate::cache::traits::CacheStore;
use crate::cache::{CacheConfig, CacheEntry, CacheSummary, CacheType};
use crate::error::Result;
use crate::models::DiscoveryRequest;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Durable result cache over a pluggable store
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

/// The single fail-open boundary: any storage error becomes the
/// operation's fallback value, with a logged warning.
fn fail_open<T>(operation: &str, fallback: T, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{operation} failed, continuing without cache: {e}");
            fallback
        }
    }
}

impl ResultCache {
    /// Create a cache over the given store and configuration
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// The injected configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up cached results for a request.
    ///
    /// Returns `None` on bypass, on a genuine miss, when the entry has
    /// outlived the TTL for its cache type, when it was stored under a
    /// different config fingerprint, or when storage fails. Expired and
    /// fingerprint-mismatched entries are deleted as a side effect.
    pub async fn get(
        &self,
        request: &DiscoveryRequest,
        cache_type: CacheType,
        bypass: bool,
    ) -> Option<Value> {
        if bypass {
            return None;
        }

        fail_open("cache lookup", None, self.try_get(request, cache_type).await)
    }

    async fn try_get(
        &self,
        request: &DiscoveryRequest,
        cache_type: CacheType,
    ) -> Result<Option<Value>> {
        let fingerprint = compute_fingerprint(&self.config);
        let key = storage_key(cache_type, &build_key(request, &fingerprint));

        let Some(entry) = self.store.fetch(&key).await? else {
            return Ok(None);
        };

        // Expiration check for this cache type
        if let Some(ttl) = self.config.ttl_for(cache_type) {
            let age = Utc::now().signed_duration_since(entry.cached_at);
            if age.num_seconds() > ttl.as_secs() as i64 {
                log::debug!("cache entry expired after {}s: {key}", age.num_seconds());
                self.store.delete(&key).await?;
                return Ok(None);
            }
        }

        // Config changed since this entry was written
        if entry.config_fingerprint != fingerprint {
            log::debug!("cache entry fingerprint mismatch: {key}");
            self.store.delete(&key).await?;
            return Ok(None);
        }

        Ok(Some(entry.results))
    }

    /// Store results for a request, replacing any prior entry.
    ///
    /// Best effort: storage failures are logged and ignored.
    pub async fn put(&self, request: &DiscoveryRequest, results: Value, cache_type: CacheType) {
        fail_open(
            "cache store",
            (),
            self.try_put(request, results, cache_type).await,
        );
    }

    async fn try_put(
        &self,
        request: &DiscoveryRequest,
        results: Value,
        cache_type: CacheType,
    ) -> Result<()> {
        let fingerprint = compute_fingerprint(&self.config);
        let key = storage_key(cache_type, &build_key(request, &fingerprint));

        let entry = CacheEntry {
            cache_key: key,
            config_fingerprint: fingerprint,
            cache_type,
            inputs: serde_json::to_value(request)?,
            results,
            cached_at: Utc::now(),
        };

        self.store.upsert(&entry).await
    }

    /// Delete every entry stored under a fingerprint other than the
    /// current one. Returns the number of entries deleted (0 when
    /// storage fails). Intended for manual cleanup after a
    /// configuration change.
    pub async fn purge_stale(&self) -> u64 {
        fail_open("cache purge", 0, self.try_purge_stale().await)
    }

    async fn try_purge_stale(&self) -> Result<u64> {
        let fingerprint = compute_fingerprint(&self.config);
        let keys = self.store.stale_keys(&fingerprint).await?;

        let mut deleted = 0;
        for key in keys {
            self.store.delete(&key).await?;
            deleted += 1;
        }

        Ok(deleted)
    }

    /// Entry counts against the current fingerprint.
    ///
    /// Degrades to zeroed counts (still carrying the fingerprint, which
    /// needs no storage access) when the store is unreachable.
    pub async fn stats(&self) -> CacheSummary {
        let fingerprint = compute_fingerprint(&self.config);
        let fallback = CacheSummary {
            config_fingerprint: fingerprint.clone(),
            ..Default::default()
        };

        fail_open("cache stats", fallback, self.try_stats(&fingerprint).await)
    }

    async fn try_stats(&self, fingerprint: &str) -> Result<CacheSummary> {
        let total_entries = self.store.count_all().await?;
        let valid_entries = self.store.count_matching(fingerprint).await?;

        Ok(CacheSummary {
            total_entries,
            valid_entries,
            stale_entries: total_entries - valid_entries,
            config_fingerprint: fingerprint.to_string(),
        })
    }
}
