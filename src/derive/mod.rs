//! Deriver: enrich merged daily records and compute the summary bundle.
//!
//! Steps, over the date-ascending input:
//! 1. inclusive date-range filter
//! 2. GHI bucket per record
//! 3. trailing PR mean over the filtered sequence
//! 4. fiscal-year index and budget PR per record
//! 5. summary statistics (fails on an empty filtered sequence)

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{DailyRecord, DeriveConfig, EnrichedRecord, GhiBucket, SummaryStats};
use crate::error::AppError;

pub mod budget;
pub mod rolling;
pub mod summary;

pub use budget::{budget_pr, fiscal_year_index};
pub use rolling::trailing_means;
pub use summary::summarize;

/// Enriched records plus their summary.
#[derive(Debug, Clone)]
pub struct Derived {
    pub enriched: Vec<EnrichedRecord>,
    pub summary: SummaryStats,
}

impl DeriveConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.window_size == 0 {
            return Err(AppError::config("`window_size` must be at least 1."));
        }
        if !self.base_budget.is_finite() {
            return Err(AppError::config("`base_budget` must be finite."));
        }
        if !self.yearly_drop.is_finite() {
            return Err(AppError::config("`yearly_drop` must be finite."));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AppError::config(format!(
                    "`start_date` ({start}) is after `end_date` ({end})."
                )));
            }
        }
        Ok(())
    }
}

/// Run every derivation step over `records` (expected in ascending date order).
pub fn derive(records: Vec<DailyRecord>, config: &DeriveConfig) -> Result<Derived, AppError> {
    config.validate()?;

    let total = records.len();
    let records = filter_range(records, config.start_date, config.end_date);
    debug!(total, kept = records.len(), "Applied date range filter");

    if records.is_empty() {
        return Err(AppError::empty_input(format!(
            "No records remain after filtering {} records to {}..={}.",
            total,
            fmt_bound(config.start_date),
            fmt_bound(config.end_date),
        )));
    }

    let enriched = enrich(&records, config);
    let summary = summarize(&enriched)?;

    Ok(Derived { enriched, summary })
}

/// Keep records with `start <= date <= end`; absent bounds are open.
pub fn filter_range(
    records: Vec<DailyRecord>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<DailyRecord> {
    records
        .into_iter()
        .filter(|r| start.is_none_or(|s| r.date >= s))
        .filter(|r| end.is_none_or(|e| r.date <= e))
        .collect()
}

/// Per-record derived fields; trailing means are positional over `records`.
pub fn enrich(records: &[DailyRecord], config: &DeriveConfig) -> Vec<EnrichedRecord> {
    let prs: Vec<f64> = records.iter().map(|r| r.pr).collect();
    let trailing = trailing_means(&prs, config.window_size);

    records
        .iter()
        .zip(trailing)
        .map(|(&record, pr_trailing_avg)| {
            let fiscal_year_index = fiscal_year_index(record.date, config.epoch_year);
            EnrichedRecord {
                record,
                ghi_bucket: GhiBucket::classify(record.ghi),
                pr_trailing_avg,
                fiscal_year_index,
                budget_pr: budget_pr(fiscal_year_index, config.base_budget, config.yearly_drop),
            }
        })
        .collect()
}

fn fmt_bound(bound: Option<NaiveDate>) -> String {
    bound.map(|d| d.to_string()).unwrap_or_else(|| "*".to_string())
}
