//! Fiscal-year indexing and the declining budget PR line.
//!
//! A fiscal year starts on the first day of `FISCAL_YEAR_START_MONTH`
//! (July). Fiscal year 0 is the one starting in July of the epoch year, so
//! with epoch 2019 the window 2019-07-01..=2020-06-30 has index 0.

use chrono::{Datelike, NaiveDate};

use crate::domain::FISCAL_YEAR_START_MONTH;

/// Fiscal-year offset of `date` relative to `epoch_year`; negative before the epoch.
pub fn fiscal_year_index(date: NaiveDate, epoch_year: i32) -> i32 {
    if date.month() >= FISCAL_YEAR_START_MONTH {
        date.year() - epoch_year
    } else {
        date.year() - epoch_year - 1
    }
}

/// Budget PR for a fiscal year: `base - index * yearly_drop`.
pub fn budget_pr(fiscal_year_index: i32, base_budget: f64, yearly_drop: f64) -> f64 {
    base_budget - f64::from(fiscal_year_index) * yearly_drop
}

/// First calendar day of the fiscal year with the given index.
pub fn fiscal_year_start(fiscal_year_index: i32, epoch_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(epoch_year + fiscal_year_index, FISCAL_YEAR_START_MONTH, 1)
}
