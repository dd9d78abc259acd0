//! Tabular artifacts: the merged daily CSV and the enriched per-day CSV.
//!
//! The merged file (`Date,GHI,PR`) is the handoff between collection and
//! evaluation, so it is also read back here.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DailyRecord, EnrichedRecord};
use crate::error::AppError;
use crate::io::ingest::parse_date;

#[derive(Serialize)]
struct DailyRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "GHI")]
    ghi: f64,
    #[serde(rename = "PR")]
    pr: f64,
}

#[derive(Serialize)]
struct EnrichedRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "GHI")]
    ghi: f64,
    #[serde(rename = "PR")]
    pr: f64,
    #[serde(rename = "GHI_Bucket")]
    ghi_bucket: &'static str,
    /// Empty cell when undefined.
    #[serde(rename = "PR_Trailing_Avg")]
    pr_trailing_avg: Option<f64>,
    #[serde(rename = "Fiscal_Year")]
    fiscal_year_index: i32,
    #[serde(rename = "Budget_PR")]
    budget_pr: f64,
}

/// Write merged records as `Date,GHI,PR`, one row per record, in the given order.
pub fn write_daily_csv(path: &Path, records: &[DailyRecord]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io(path, format!("Failed to create daily CSV: {e}")))?;
    let mut writer = csv::Writer::from_writer(file);

    for r in records {
        writer
            .serialize(DailyRow {
                date: r.date,
                ghi: r.ghi,
                pr: r.pr,
            })
            .map_err(|e| AppError::io(path, format!("Failed to write daily CSV row: {e}")))?;
    }

    // Header-only output for an empty merge.
    if records.is_empty() {
        writer
            .write_record(["Date", "GHI", "PR"])
            .map_err(|e| AppError::io(path, format!("Failed to write daily CSV header: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(path, format!("Failed to flush daily CSV: {e}")))?;
    Ok(())
}

/// Read a merged `Date,GHI,PR` file back into date-ordered records.
pub fn read_daily_csv(path: &Path) -> Result<Vec<DailyRecord>, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(path, format!("Failed to open daily CSV: {e}")))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(path, Some(1), format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase(), idx))
        .collect();

    let column = |name: &str| {
        header_map
            .get(name)
            .copied()
            .ok_or_else(|| AppError::parse(path, Some(1), format!("Missing required column: `{name}`")))
    };
    let date_idx = column("date")?;
    let ghi_idx = column("ghi")?;
    let pr_idx = column("pr")?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::parse(path, Some(line), format!("CSV parse error: {e}")))?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let date = parse_date(field(date_idx)).map_err(|msg| AppError::parse(path, Some(line), msg))?;
        let ghi = parse_number(field(ghi_idx))
            .ok_or_else(|| AppError::parse(path, Some(line), format!("Invalid GHI value '{}'.", field(ghi_idx))))?;
        let pr = parse_number(field(pr_idx))
            .ok_or_else(|| AppError::parse(path, Some(line), format!("Invalid PR value '{}'.", field(pr_idx))))?;

        records.push(DailyRecord { date, ghi, pr });
    }

    // Hand-edited files may be out of order; duplicates keep file order.
    records.sort_by_key(|r| r.date);
    Ok(records)
}

/// Write the enriched sequence, one row per record.
pub fn write_enriched_csv(path: &Path, enriched: &[EnrichedRecord]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io(path, format!("Failed to create enriched CSV: {e}")))?;
    let mut writer = csv::Writer::from_writer(file);

    for e in enriched {
        writer
            .serialize(EnrichedRow {
                date: e.record.date,
                ghi: e.record.ghi,
                pr: e.record.pr,
                ghi_bucket: e.ghi_bucket.label(),
                pr_trailing_avg: e.pr_trailing_avg,
                fiscal_year_index: e.fiscal_year_index,
                budget_pr: e.budget_pr,
            })
            .map_err(|e| AppError::io(path, format!("Failed to write enriched CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(path, format!("Failed to flush enriched CSV: {e}")))?;
    Ok(())
}

fn parse_number(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
