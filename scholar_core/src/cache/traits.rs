//! Cache store trait definition
//!
//! The persistent store is a collaborator: a keyed collection of
//! [`CacheEntry`] supporting point lookup, point upsert, point delete
//! and an inequality-filtered key listing for purges. Implementations
//! must make individual operations atomic; the cache layer performs no
//! multi-step transactions.

use crate::cache::CacheEntry;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for cache store implementations
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch an entry by its storage key
    async fn fetch(&self, cache_key: &str) -> Result<Option<CacheEntry>>;

    /// Insert or fully replace the entry at its key.
    ///
    /// Must be a real conditional write (replace-on-conflict), not a
    /// read-then-write pair, so concurrent puts to the same key cannot
    /// lose updates.
    async fn upsert(&self, entry: &CacheEntry) -> Result<()>;

    /// Delete an entry by key; deleting an absent key is not an error
    async fn delete(&self, cache_key: &str) -> Result<()>;

    /// Keys of all entries whose fingerprint differs from the given one
    async fn stale_keys(&self, config_fingerprint: &str) -> Result<Vec<String>>;

    /// Total number of entries
    async fn count_all(&self) -> Result<u64>;

    /// Number of entries matching the given fingerprint
    async fn count_matching(&self, config_fingerprint: &str) -> Result<u64>;
}
