//! Memory-based cache store implementation
//!
//! A HashMap behind an async RwLock. Used by tests and by store-less
//! deployments where cross-process persistence is not needed.

use crate::cache::CacheEntry;
use crate::cache::traits::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory cache store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held (test convenience)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn fetch(&self, cache_key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(cache_key).cloned())
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(entry.cache_key.clone(), entry.clone());
        Ok(())
    }

    async fn delete(&self, cache_key: &str) -> Result<()> {
        self.entries.write().await.remove(cache_key);
        Ok(())
    }

    async fn stale_keys(&self, config_fingerprint: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|entry| entry.config_fingerprint != config_fingerprint)
            .map(|entry| entry.cache_key.clone())
            .collect())
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(self.entries.read().await.len() as u64)
    }

    async fn count_matching(&self, config_fingerprint: &str) -> Result<u64> {
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|entry| entry.config_fingerprint == config_fingerprint)
            .count() as u64)
    }
}
