//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - merged and enriched daily records (`DailyRecord`, `EnrichedRecord`)
//! - business-rule constants (GHI thresholds, fiscal-year start, summary windows)
//! - resolved run configuration (`CollectConfig`, `DeriveConfig`, `OutputConfig`)

pub mod types;

pub use types::*;
