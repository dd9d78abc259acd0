//! Formatted terminal output.
//!
//! Formatting lives here so the derivation code stays free of presentation
//! and output changes stay localized.

use std::collections::BTreeMap;

use crate::derive::budget::fiscal_year_start;
use crate::domain::{CollectReport, DeriveConfig, EnrichedRecord, GhiBucket, SummaryStats};

/// Per-fiscal-year rollup for the budget table.
#[derive(Debug, Clone, PartialEq)]
pub struct FiscalYearRow {
    pub fiscal_year_index: i32,
    pub budget_pr: f64,
    pub records: usize,
    pub above_budget: usize,
    pub mean_pr: f64,
}

/// Group enriched records by fiscal year, in ascending index order.
pub fn fiscal_year_rows(enriched: &[EnrichedRecord]) -> Vec<FiscalYearRow> {
    let mut groups: BTreeMap<i32, (f64, usize, usize, f64)> = BTreeMap::new();
    for e in enriched {
        let entry = groups.entry(e.fiscal_year_index).or_insert((e.budget_pr, 0, 0, 0.0));
        entry.1 += 1;
        if e.is_above_budget() {
            entry.2 += 1;
        }
        entry.3 += e.record.pr;
    }

    groups
        .into_iter()
        .map(|(fiscal_year_index, (budget_pr, records, above_budget, pr_sum))| FiscalYearRow {
            fiscal_year_index,
            budget_pr,
            records,
            above_budget,
            mean_pr: pr_sum / records as f64,
        })
        .collect()
}

/// Record count per GHI bucket, in bucket order (zero counts included).
pub fn bucket_counts(enriched: &[EnrichedRecord]) -> Vec<(GhiBucket, usize)> {
    GhiBucket::ALL
        .iter()
        .map(|&bucket| (bucket, enriched.iter().filter(|e| e.ghi_bucket == bucket).count()))
        .collect()
}

/// The chart annotation block: trailing means, then lifetime.
pub fn format_trailing_means(summary: &SummaryStats) -> String {
    let mut out = String::new();
    for w in &summary.trailing {
        out.push_str(&format!("Avg PR (last {} days): {:.2}\n", w.window, w.mean));
    }
    out.push_str(&format!("Avg PR (Lifetime): {:.2}", summary.lifetime_mean));
    out
}

pub fn format_above_budget(summary: &SummaryStats) -> String {
    // Debug formatting keeps the `.0` on whole percentages.
    format!("Points above target budget PR: {:?} %", summary.percent_above_budget)
}

/// Format the full evaluation summary.
pub fn format_summary(enriched: &[EnrichedRecord], summary: &SummaryStats, config: &DeriveConfig) -> String {
    let mut out = String::new();

    out.push_str("=== prb - Performance Ratio Evaluation ===\n");
    out.push_str(&format!(
        "Records: n={} | {} .. {}\n",
        summary.record_count, summary.first_date, summary.last_date
    ));
    out.push_str(&format!(
        "Budget: base={} drop={}/yr epoch FY{} | trailing window={}\n",
        config.base_budget, config.yearly_drop, config.epoch_year, config.window_size
    ));

    out.push('\n');
    out.push_str(&format_trailing_means(summary));
    out.push('\n');
    out.push_str(&format_above_budget(summary));
    out.push_str(&format!(
        " ({} of {})\n",
        summary.above_budget_count, summary.record_count
    ));

    out.push_str("\nGHI buckets:\n");
    for (bucket, count) in bucket_counts(enriched) {
        out.push_str(&format!("  {:<9} {:<18} {count}\n", bucket.label(), bucket.range_label()));
    }

    out.push_str("\nFiscal years:\n");
    out.push_str("  FY   start       budget   n     above  mean PR\n");
    for row in fiscal_year_rows(enriched) {
        let start = fiscal_year_start(row.fiscal_year_index, config.epoch_year)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<4} {:<11} {:<8.2} {:<5} {:<6} {:.2}\n",
            row.fiscal_year_index, start, row.budget_pr, row.records, row.above_budget, row.mean_pr
        ));
    }

    out
}

/// One-line description of a collector run.
pub fn format_collect_report(report: &CollectReport) -> String {
    format!(
        "Collected {} records from {} periods ({} skipped), {} file pairs ({} unpaired files skipped).",
        report.records, report.periods_visited, report.periods_skipped, report.files_paired, report.files_skipped
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::domain::DailyRecord;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn fiscal_year_rows_group_by_index() {
        let records = vec![
            DailyRecord { date: d(2023, 6, 29), ghi: 1.0, pr: 70.0 },
            DailyRecord { date: d(2023, 6, 30), ghi: 1.0, pr: 74.0 },
            DailyRecord { date: d(2023, 7, 1), ghi: 7.0, pr: 69.0 },
        ];
        let out = derive(records, &DeriveConfig::default()).unwrap();

        let rows = fiscal_year_rows(&out.enriched);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fiscal_year_index, 3);
        assert_eq!(rows[0].records, 2);
        assert_eq!(rows[0].above_budget, 1);
        assert_eq!(rows[0].mean_pr, 72.0);
        assert_eq!(rows[1].fiscal_year_index, 4);
        assert_eq!(rows[1].above_budget, 0);

        let counts = bucket_counts(&out.enriched);
        assert_eq!(counts[0], (GhiBucket::VeryLow, 2));
        assert_eq!(counts[3], (GhiBucket::High, 1));
    }

    #[test]
    fn summary_text_matches_chart_annotation() {
        let records = vec![
            DailyRecord { date: d(2023, 1, 1), ghi: 1.0, pr: 80.0 },
            DailyRecord { date: d(2023, 1, 2), ghi: 1.0, pr: 60.0 },
        ];
        let config = DeriveConfig::default();
        let out = derive(records, &config).unwrap();

        let text = format_summary(&out.enriched, &out.summary, &config);
        assert!(text.contains("Avg PR (last 7 days): 70.00\n"));
        assert!(text.contains("Avg PR (Lifetime): 70.00\n"));
        assert!(text.contains("Points above target budget PR: 50.0 % (1 of 2)"));
        assert!(text.contains("2022-07-01"));
    }

    #[test]
    fn above_budget_keeps_decimal_point() {
        let mut summary = SummaryStats {
            trailing: Vec::new(),
            lifetime_mean: 70.0,
            percent_above_budget: 0.0,
            above_budget_count: 0,
            record_count: 4,
            first_date: d(2023, 1, 1),
            last_date: d(2023, 1, 4),
        };
        assert_eq!(format_above_budget(&summary), "Points above target budget PR: 0.0 %");

        summary.percent_above_budget = 33.33;
        assert_eq!(format_above_budget(&summary), "Points above target budget PR: 33.33 %");
    }
}
