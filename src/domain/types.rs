//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - handed from the collector to the deriver by value
//! - exported to CSV/JSON
//! - consumed verbatim by the chart renderers

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Name of the Performance Ratio family directory under the data root.
pub const PR_FAMILY_DIR: &str = "PR";
/// Name of the Global Horizontal Irradiance family directory under the data root.
pub const GHI_FAMILY_DIR: &str = "GHI";

/// GHI below this value is "very low".
pub const GHI_LOW: f64 = 2.0;
/// GHI at or above this value (and below `GHI_HIGH`) is "moderate".
pub const GHI_MODERATE: f64 = 4.0;
/// GHI at or above this value is "high".
pub const GHI_HIGH: f64 = 6.0;

/// Fiscal years start on the first day of this calendar month.
pub const FISCAL_YEAR_START_MONTH: u32 = 7;

/// Trailing windows (in records) reported in the summary.
pub const SUMMARY_WINDOWS: [usize; 5] = [7, 30, 60, 90, 365];

/// One merged day of telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub ghi: f64,
    pub pr: f64,
}

/// Irradiance classification of a day.
///
/// Variants are declared in threshold order so `Ord` follows irradiance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhiBucket {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl GhiBucket {
    pub const ALL: [GhiBucket; 4] = [GhiBucket::VeryLow, GhiBucket::Low, GhiBucket::Moderate, GhiBucket::High];

    pub fn classify(ghi: f64) -> Self {
        if ghi < GHI_LOW {
            GhiBucket::VeryLow
        } else if ghi < GHI_MODERATE {
            GhiBucket::Low
        } else if ghi < GHI_HIGH {
            GhiBucket::Moderate
        } else {
            GhiBucket::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GhiBucket::VeryLow => "very low",
            GhiBucket::Low => "low",
            GhiBucket::Moderate => "moderate",
            GhiBucket::High => "high",
        }
    }

    /// Human-readable GHI range for legends.
    pub fn range_label(self) -> String {
        match self {
            GhiBucket::VeryLow => format!("GHI < {GHI_LOW}"),
            GhiBucket::Low => format!("{GHI_LOW} <= GHI < {GHI_MODERATE}"),
            GhiBucket::Moderate => format!("{GHI_MODERATE} <= GHI < {GHI_HIGH}"),
            GhiBucket::High => format!("GHI >= {GHI_HIGH}"),
        }
    }
}

/// A daily record plus every field derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub record: DailyRecord,
    pub ghi_bucket: GhiBucket,
    /// `None` until a full trailing window is available.
    pub pr_trailing_avg: Option<f64>,
    pub fiscal_year_index: i32,
    pub budget_pr: f64,
}

impl EnrichedRecord {
    pub fn is_above_budget(&self) -> bool {
        self.record.pr > self.budget_pr
    }
}

/// Trailing PR mean over the last `window` records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowMean {
    pub window: usize,
    pub mean: f64,
}

/// Scalar bundle computed once over the full enriched sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// One entry per `SUMMARY_WINDOWS` size, in that order.
    pub trailing: Vec<WindowMean>,
    pub lifetime_mean: f64,
    /// Rounded to two decimals.
    pub percent_above_budget: f64,
    pub above_budget_count: usize,
    pub record_count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl SummaryStats {
    #[cfg(test)]
    pub fn trailing_mean(&self, window: usize) -> Option<f64> {
        self.trailing.iter().find(|w| w.window == window).map(|w| w.mean)
    }
}

/// How the rows of a PR/GHI file pair are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PairingMode {
    /// Require identical dates row-for-row and equal row counts.
    Strict,
    /// Zip rows positionally and truncate to the shorter file.
    Truncate,
}

/// Which column of a metric file holds the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelector {
    /// The first column (after the date column) whose cells are all numeric.
    #[default]
    FirstNumeric,
    /// A column with this header name (case-insensitive).
    Named(String),
}

impl ColumnSelector {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => ColumnSelector::Named(name.to_string()),
            None => ColumnSelector::FirstNumeric,
        }
    }
}

/// Resolved collector configuration.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub root_path: PathBuf,
    pub pairing: PairingMode,
    pub pr_column: ColumnSelector,
    pub ghi_column: ColumnSelector,
}

impl CollectConfig {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            pairing: PairingMode::Strict,
            pr_column: ColumnSelector::FirstNumeric,
            ghi_column: ColumnSelector::FirstNumeric,
        }
    }
}

/// Counters describing what the collector visited and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectReport {
    pub periods_visited: usize,
    pub periods_skipped: usize,
    pub files_paired: usize,
    pub files_skipped: usize,
    pub records: usize,
}

/// Collector output: date-sorted records + traversal counters.
#[derive(Debug, Clone)]
pub struct Collected {
    pub records: Vec<DailyRecord>,
    pub report: CollectReport,
}

/// Resolved deriver configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeriveConfig {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub window_size: usize,
    pub epoch_year: i32,
    pub base_budget: f64,
    pub yearly_drop: f64,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            window_size: 30,
            epoch_year: 2019,
            base_budget: 73.9,
            yearly_drop: 0.8,
        }
    }
}

/// Where evaluation results go.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub export_enriched: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}
