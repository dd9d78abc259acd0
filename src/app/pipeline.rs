//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! walk tree -> merge -> persist merged CSV -> derive -> report/exports
//!
//! The subcommand handlers then only decide which stages to run.

use std::path::Path;

use tracing::info;

use crate::collect::collect;
use crate::derive::{Derived, derive};
use crate::domain::{CollectConfig, Collected, DailyRecord, DeriveConfig, OutputConfig};
use crate::error::AppError;
use crate::io::{read_daily_csv, write_daily_csv, write_enriched_csv, write_summary_json};

/// Collect the tree and persist the merged CSV.
///
/// The CSV is written only after the whole merge succeeded.
pub fn run_collect(config: &CollectConfig, output: &Path) -> Result<Collected, AppError> {
    let collected = collect(config)?;
    write_daily_csv(output, &collected.records)?;
    info!(path = %output.display(), records = collected.records.len(), "Wrote merged CSV");
    Ok(collected)
}

/// Load a merged CSV and derive from it.
pub fn run_evaluate_file(input: &Path, config: &DeriveConfig) -> Result<Derived, AppError> {
    let records = read_daily_csv(input)?;
    info!(path = %input.display(), records = records.len(), "Loaded merged CSV");
    derive(records, config)
}

/// Derive from in-memory records.
pub fn run_evaluate(records: Vec<DailyRecord>, config: &DeriveConfig) -> Result<Derived, AppError> {
    let derived = derive(records, config)?;
    info!(
        records = derived.summary.record_count,
        percent_above_budget = derived.summary.percent_above_budget,
        "Derived evaluation"
    );
    Ok(derived)
}

/// Write the optional evaluation artifacts.
pub fn write_outputs(derived: &Derived, derive_config: &DeriveConfig, output: &OutputConfig) -> Result<(), AppError> {
    if let Some(path) = &output.export_enriched {
        write_enriched_csv(path, &derived.enriched)?;
        info!(path = %path.display(), "Wrote enriched CSV");
    }
    if let Some(path) = &output.export_summary {
        write_summary_json(path, &derived.summary, derive_config)?;
        info!(path = %path.display(), "Wrote summary JSON");
    }
    if let Some(path) = &output.chart {
        crate::plot::write_svg_chart(path, &derived.enriched, &derived.summary, derive_config)?;
        info!(path = %path.display(), "Wrote chart");
    }
    Ok(())
}
