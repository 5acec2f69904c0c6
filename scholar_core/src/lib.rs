//! ScholarSource Core Library
//!
//! This is the core library for the ScholarSource resource discovery
//! broker, providing the config-sensitive result cache, the markdown
//! report parser, domain filtering and the discovery orchestration
//! around the external agent pipeline.

pub mod cache;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod models;
pub mod parser;

// Re-export main types
pub use cache::{
    CacheConfig, CacheEntry, CacheStore, CacheSummary, CacheType, MemoryStore, ResultCache,
    SqliteCacheStore,
};
pub use discovery::{DiscoveryOutcome, DiscoveryService, ResourcePipeline};
pub use error::{Error, Result};
pub use filter::filter_excluded_domains;
pub use models::{
    AnalysisSummary, DiscoveryRequest, ParsedReport, Resource, ResourceType, TextbookInfo,
};
pub use parser::parse_report;
