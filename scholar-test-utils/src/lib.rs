//! Test utilities for the ScholarSource core
//!
//! This crate provides mock implementations and test builders for
//! exercising the cache and discovery components without a real store
//! or agent pipeline.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::ReportBuilder;
pub use mocks::{FailingStore, ScriptedPipeline};
