//! Write the evaluation summary as JSON.
//!
//! The summary JSON is the portable form of one evaluation run:
//! - the trailing/lifetime PR means and the above-budget share
//! - the date span actually evaluated
//! - the derive parameters that produced them

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::{DeriveConfig, SummaryStats};
use crate::error::AppError;

#[derive(Serialize)]
struct SummaryFile<'a> {
    tool: &'static str,
    parameters: &'a DeriveConfig,
    summary: &'a SummaryStats,
}

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, summary: &SummaryStats, config: &DeriveConfig) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io(path, format!("Failed to create summary JSON: {e}")))?;

    let doc = SummaryFile {
        tool: "prb",
        parameters: config,
        summary,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::io(path, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
