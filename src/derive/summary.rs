//! Summary statistics over the enriched sequence.

use crate::derive::rolling::{mean, tail_mean};
use crate::domain::{EnrichedRecord, SUMMARY_WINDOWS, SummaryStats, WindowMean};
use crate::error::AppError;

/// Compute trailing/lifetime PR means and the above-budget share.
pub fn summarize(enriched: &[EnrichedRecord]) -> Result<SummaryStats, AppError> {
    let (Some(first), Some(last)) = (enriched.first(), enriched.last()) else {
        return Err(AppError::empty_input("No records to summarize."));
    };

    let prs: Vec<f64> = enriched.iter().map(|e| e.record.pr).collect();

    let trailing = SUMMARY_WINDOWS
        .iter()
        .filter_map(|&window| tail_mean(&prs, window).map(|mean| WindowMean { window, mean }))
        .collect();

    let above_budget_count = enriched.iter().filter(|e| e.is_above_budget()).count();
    let percent_above_budget = round2(above_budget_count as f64 / enriched.len() as f64 * 100.0);

    Ok(SummaryStats {
        trailing,
        lifetime_mean: mean(&prs),
        percent_above_budget,
        above_budget_count,
        record_count: enriched.len(),
        first_date: first.record.date,
        last_date: last.record.date,
    })
}

/// Round to two decimal places, correctly rounded with ties to even.
///
/// Works on the exact binary value: `2.675` is stored just below the tie and
/// rounds down, while `3.125` is an exact tie and rounds to `3.12`. Scaling by
/// 100 first would lose that distinction, so this goes through fixed-point
/// formatting instead.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
