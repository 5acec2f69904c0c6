//! SQLite-based implementation of the CacheStore trait
//!
//! Persists cache entries in a single `course_cache` table with
//! `cache_key` as the unique key. Upserts use a real
//! `ON CONFLICT .. DO UPDATE` conditional write. Timestamps are stored
//! as ISO-8601 text; a trailing `Z` UTC marker is tolerated on read.

use crate::cache::CacheEntry;
use crate::cache::traits::CacheStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

/// SQLite-backed cache store
pub struct SqliteCacheStore {
    pool: SqlitePool,
}

impl SqliteCacheStore {
    /// Open (or create) the cache database at the given path
    pub async fn new(db_path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::storage(format!("failed to create cache directory: {e}")))?;
        }

        // WAL mode keeps concurrent readers from blocking writers
        let connect_options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
                .map_err(|e| Error::storage(format!("invalid cache database path: {e}")))?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| Error::storage(format!("failed to connect to cache database: {e}")))?;

        Self::initialize_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
        let schema = r#"
            CREATE TABLE IF NOT EXISTS course_cache (
                cache_key TEXT PRIMARY KEY,
                config_fingerprint TEXT NOT NULL,
                cache_type TEXT NOT NULL,
                inputs TEXT NOT NULL,
                results TEXT NOT NULL,
                cached_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_course_cache_fingerprint
                ON course_cache(config_fingerprint);
        "#;

        sqlx::raw_sql(schema)
            .execute(pool)
            .await
            .map_err(|e| Error::storage(format!("failed to initialize cache schema: {e}")))?;

        Ok(())
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<CacheEntry> {
        let cache_key: String = row.try_get("cache_key")?;
        let config_fingerprint: String = row.try_get("config_fingerprint")?;
        let cache_type: String = row.try_get("cache_type")?;
        let inputs: String = row.try_get("inputs")?;
        let results: String = row.try_get("results")?;
        let cached_at: String = row.try_get("cached_at")?;

        Ok(CacheEntry {
            cache_key,
            config_fingerprint,
            cache_type: cache_type.parse()?,
            inputs: serde_json::from_str(&inputs)
                .map_err(|e| Error::storage(format!("malformed inputs column: {e}")))?,
            results: serde_json::from_str(&results)
                .map_err(|e| Error::storage(format!("malformed results column: {e}")))?,
            cached_at: parse_timestamp(&cached_at)?,
        })
    }
}

/// Parse an ISO-8601 timestamp, tolerating a trailing `Z`
fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn fetch(&self, cache_key: &str) -> Result<Option<CacheEntry>> {
        let row = sqlx::query(
            r#"
            SELECT cache_key, config_fingerprint, cache_type, inputs, results, cached_at
            FROM course_cache
            WHERE cache_key = ?
            "#,
        )
        .bind(cache_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_entry(&row)).transpose()
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO course_cache (
                cache_key, config_fingerprint, cache_type, inputs, results, cached_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(cache_key) DO UPDATE SET
                config_fingerprint = excluded.config_fingerprint,
                cache_type = excluded.cache_type,
                inputs = excluded.inputs,
                results = excluded.results,
                cached_at = excluded.cached_at
            "#,
        )
        .bind(&entry.cache_key)
        .bind(&entry.config_fingerprint)
        .bind(entry.cache_type.label())
        .bind(serde_json::to_string(&entry.inputs)?)
        .bind(serde_json::to_string(&entry.results)?)
        .bind(entry.cached_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, cache_key: &str) -> Result<()> {
        sqlx::query("DELETE FROM course_cache WHERE cache_key = ?")
            .bind(cache_key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn stale_keys(&self, config_fingerprint: &str) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT cache_key FROM course_cache WHERE config_fingerprint != ?")
            .bind(config_fingerprint)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("cache_key").map_err(Error::from))
            .collect()
    }

    async fn count_all(&self) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_cache")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn count_matching(&self, config_fingerprint: &str) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM course_cache WHERE config_fingerprint = ?",
        )
        .bind(config_fingerprint)
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }
}
