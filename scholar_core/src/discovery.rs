//! Discovery orchestration
//!
//! Composes the result cache, the external agent pipeline and the report
//! parser into one operation. The pipeline itself is an opaque
//! collaborator behind the [`ResourcePipeline`] trait: it takes the
//! submission snapshot and returns a rendered markdown report.
//!
//! Cache usage follows the two granularities: a valid `full` entry skips
//! the pipeline entirely, a valid `analysis` entry is surfaced to the
//! caller (course understanding already done) and refreshed results are
//! stored back at both granularities, best effort.

use crate::cache::{CacheType, ResultCache};
use crate::error::{Error, Result};
use crate::models::{AnalysisSummary, DiscoveryRequest, ParsedReport};
use crate::parser::parse_report;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// The external agent pipeline.
///
/// Implementations wrap whatever multi-agent machinery produces the
/// report; the core only sees markdown text. Long-running
/// implementations are expected to observe caller-side cancellation
/// (dropping the returned future must abort the run).
#[async_trait]
pub trait ResourcePipeline: Send + Sync {
    /// Run discovery for a request and return the rendered report
    async fn run(&self, request: &DiscoveryRequest) -> Result<String>;
}

/// Result of a discovery run
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryOutcome {
    pub report: ParsedReport,
    /// Raw pipeline output; `None` when served from the full-result cache
    pub raw_markdown: Option<String>,
    /// Whether the report came from the full-result cache
    pub from_cache: bool,
    /// Whether a fresh pipeline run reused cached course analysis
    pub analysis_cache_hit: bool,
}

/// Pipeline failure narration at the head of a report
static ERROR_NARRATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"ERROR:\s*([^\n]+)").unwrap());

/// Discovery service wrapping the agent pipeline with caching
pub struct DiscoveryService {
    pipeline: Arc<dyn ResourcePipeline>,
    cache: ResultCache,
}

impl DiscoveryService {
    /// Create a service over the given pipeline and cache
    pub fn new(pipeline: Arc<dyn ResourcePipeline>, cache: ResultCache) -> Self {
        Self { pipeline, cache }
    }

    /// The underlying result cache
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Run discovery for a request.
    ///
    /// Cache lookups and stores never fail the run; only a pipeline
    /// failure (or failure narration in its report) is propagated.
    pub async fn discover(&self, request: &DiscoveryRequest) -> Result<DiscoveryOutcome> {
        let bypass = request.bypass_cache;

        // Reuse complete results while they are fresh
        if let Some(results) = self.cache.get(request, CacheType::Full, bypass).await {
            match serde_json::from_value::<ParsedReport>(results) {
                Ok(report) => {
                    log::info!("cache hit: serving full discovery results");
                    return Ok(DiscoveryOutcome {
                        report,
                        raw_markdown: None,
                        from_cache: true,
                        analysis_cache_hit: false,
                    });
                }
                Err(e) => {
                    log::warn!("cached full results undeserializable, rerunning discovery: {e}");
                }
            }
        }

        // Course analysis survives longer than full results
        let analysis_cache_hit = self
            .cache
            .get(request, CacheType::Analysis, bypass)
            .await
            .is_some();
        if analysis_cache_hit {
            log::info!("cache hit: course analysis already available, discovering resources");
        } else {
            log::info!("cache miss: running fresh analysis");
        }

        let markdown = self.pipeline.run(request).await?;

        // The pipeline narrates hard failures at the head of its report
        if let Some(message) = failure_narration(&markdown) {
            return Err(Error::pipeline(message));
        }

        let report = parse_report(&markdown, request.excluded_sites.as_deref());

        // Store course understanding when it was freshly computed
        if !analysis_cache_hit {
            if let Some(textbook_info) = &report.textbook_info {
                let summary = AnalysisSummary::new(textbook_info, &markdown);
                match serde_json::to_value(&summary) {
                    Ok(payload) => {
                        self.cache.put(request, payload, CacheType::Analysis).await;
                    }
                    Err(e) => log::warn!("analysis payload serialization failed: {e}"),
                }
            }
        }

        // Store the complete results for the shorter full TTL
        match serde_json::to_value(&report) {
            Ok(payload) => self.cache.put(request, payload, CacheType::Full).await,
            Err(e) => log::warn!("full payload serialization failed: {e}"),
        }

        Ok(DiscoveryOutcome {
            report,
            raw_markdown: Some(markdown),
            from_cache: false,
            analysis_cache_hit,
        })
    }
}

/// Extract the failure message when the head of a report is error
/// narration rather than resources.
fn failure_narration(markdown: &str) -> Option<String> {
    let head: String = markdown.chars().take(500).collect();
    if !head.contains("ERROR:") {
        return None;
    }

    let message = ERROR_NARRATION
        .captures(markdown)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| "Cannot access provided resources".to_string());

    Some(message)
}
