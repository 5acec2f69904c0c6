//! Mock implementations of the cache store and agent pipeline
//!
//! `FailingStore` errors on every operation so fail-open behavior can be
//! asserted; `ScriptedPipeline` returns canned reports (or errors) and
//! counts its invocations so cache hits can be distinguished from runs.

use async_trait::async_trait;
use scholar_core::cache::{CacheEntry, CacheStore};
use scholar_core::discovery::ResourcePipeline;
use scholar_core::error::{Error, Result};
use scholar_core::models::DiscoveryRequest;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cache store whose every operation fails with a storage error
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }

    fn refuse<T>(&self, operation: &str) -> Result<T> {
        Err(Error::storage(format!(
            "simulated store outage during {operation}"
        )))
    }
}

#[async_trait]
impl CacheStore for FailingStore {
    async fn fetch(&self, _cache_key: &str) -> Result<Option<CacheEntry>> {
        self.refuse("fetch")
    }

    async fn upsert(&self, _entry: &CacheEntry) -> Result<()> {
        self.refuse("upsert")
    }

    async fn delete(&self, _cache_key: &str) -> Result<()> {
        self.refuse("delete")
    }

    async fn stale_keys(&self, _config_fingerprint: &str) -> Result<Vec<String>> {
        self.refuse("stale_keys")
    }

    async fn count_all(&self) -> Result<u64> {
        self.refuse("count_all")
    }

    async fn count_matching(&self, _config_fingerprint: &str) -> Result<u64> {
        self.refuse("count_matching")
    }
}

/// Pipeline mock returning scripted reports in order
///
/// Each call pops the next scripted response; the last response repeats
/// once the script is exhausted. The run counter lets tests assert
/// whether the pipeline was actually invoked or short-circuited by the
/// cache.
pub struct ScriptedPipeline {
    responses: Mutex<Vec<Result<String>>>,
    runs: AtomicUsize,
}

impl ScriptedPipeline {
    /// Pipeline that always returns the same report
    pub fn returning(report: &str) -> Self {
        Self {
            responses: Mutex::new(vec![Ok(report.to_string())]),
            runs: AtomicUsize::new(0),
        }
    }

    /// Pipeline that always fails with the given message
    pub fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(vec![Err(Error::pipeline(message))]),
            runs: AtomicUsize::new(0),
        }
    }

    /// Pipeline returning the given reports in order, repeating the last
    pub fn with_script(reports: &[&str]) -> Self {
        Self {
            responses: Mutex::new(reports.iter().map(|r| Ok(r.to_string())).collect()),
            runs: AtomicUsize::new(0),
        }
    }

    /// Number of times the pipeline has been run
    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourcePipeline for ScriptedPipeline {
    async fn run(&self, _request: &DiscoveryRequest) -> Result<String> {
        let run = self.runs.fetch_add(1, Ordering::SeqCst);

        let responses = self.responses.lock().unwrap();
        let index = run.min(responses.len() - 1);
        match &responses[index] {
            Ok(report) => Ok(report.clone()),
            Err(Error::Pipeline { message }) => Err(Error::pipeline(message.clone())),
            Err(Error::Storage(message)) => Err(Error::storage(message.clone())),
            Err(e) => Err(Error::pipeline(e.to_string())),
        }
    }
}
