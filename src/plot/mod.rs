//! Chart rendering for an evaluated sequence.
//!
//! Series and bounds are computed once in [`ChartSeries`]; the renderers
//! (`ascii` for the terminal, `chart` for SVG) only draw. The x axis is days
//! since the first record, so both renderers share one numeric scale.

use chrono::NaiveDate;

use crate::domain::{EnrichedRecord, GhiBucket};

pub mod ascii;
pub mod chart;

pub use ascii::render_ascii_plot;
pub use chart::write_svg_chart;

/// Render-ready series derived from an enriched sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Daily PR points as `(day, pr)`, grouped by GHI bucket (in `GhiBucket::ALL` order).
    pub points: Vec<(GhiBucket, Vec<(f64, f64)>)>,
    /// Contiguous runs of defined trailing averages.
    pub trailing: Vec<Vec<(f64, f64)>>,
    /// Budget PR as a step line.
    pub budget: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    /// Padded to leave a margin around the data.
    pub y_bounds: [f64; 2],
}

impl ChartSeries {
    /// `None` for an empty sequence.
    pub fn from_enriched(enriched: &[EnrichedRecord]) -> Option<Self> {
        let first_date = enriched.iter().map(|e| e.record.date).min()?;
        let last_date = enriched.iter().map(|e| e.record.date).max()?;
        let day = |date: NaiveDate| (date - first_date).num_days() as f64;

        let points = GhiBucket::ALL
            .iter()
            .map(|&bucket| {
                let pts = enriched
                    .iter()
                    .filter(|e| e.ghi_bucket == bucket)
                    .map(|e| (day(e.record.date), e.record.pr))
                    .collect();
                (bucket, pts)
            })
            .collect();

        let (y_min, y_max) = y_range(enriched).unwrap_or((0.0, 100.0));
        let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
        let x_max = day(last_date).max(1.0);

        Some(Self {
            first_date,
            last_date,
            points,
            trailing: trailing_segments(enriched, &day),
            budget: budget_steps(enriched, &day),
            x_bounds: [0.0, x_max],
            y_bounds: [y_min, y_max],
        })
    }

    /// Calendar date for an x-axis value.
    pub fn date_at(&self, day: f64) -> NaiveDate {
        self.first_date + chrono::Duration::days(day.round() as i64)
    }
}

/// Budget line as a step function: flat until the next record, then vertical.
fn budget_steps(enriched: &[EnrichedRecord], day: &impl Fn(NaiveDate) -> f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(enriched.len() * 2);
    let mut prev: Option<f64> = None;
    for e in enriched {
        let t = day(e.record.date);
        if let Some(prev) = prev {
            if prev != e.budget_pr {
                out.push((t, prev));
            }
        }
        out.push((t, e.budget_pr));
        prev = Some(e.budget_pr);
    }
    out
}

fn trailing_segments(enriched: &[EnrichedRecord], day: &impl Fn(NaiveDate) -> f64) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for e in enriched {
        match e.pr_trailing_avg {
            Some(avg) => current.push((day(e.record.date), avg)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn y_range(enriched: &[EnrichedRecord]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for e in enriched {
        for y in [Some(e.record.pr), Some(e.budget_pr), e.pr_trailing_avg].into_iter().flatten() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 1.0, min_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRecord;

    fn enriched(date: NaiveDate, pr: f64, avg: Option<f64>, budget: f64) -> EnrichedRecord {
        EnrichedRecord {
            record: DailyRecord { date, ghi: 3.0, pr },
            ghi_bucket: GhiBucket::Low,
            pr_trailing_avg: avg,
            fiscal_year_index: 3,
            budget_pr: budget,
        }
    }

    #[test]
    fn trailing_segments_break_on_undefined() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let records = vec![
            enriched(start, 70.0, None, 71.5),
            enriched(start + chrono::Days::new(1), 70.0, Some(70.0), 71.5),
            enriched(start + chrono::Days::new(2), 70.0, None, 71.5),
            enriched(start + chrono::Days::new(3), 70.0, Some(71.0), 71.5),
        ];

        let series = ChartSeries::from_enriched(&records).unwrap();
        assert_eq!(series.trailing, vec![vec![(1.0, 70.0)], vec![(3.0, 71.0)]]);
        assert_eq!(series.points[1].1.len(), 4);
        assert!(series.points[0].1.is_empty());
    }

    #[test]
    fn budget_line_steps_at_fiscal_boundary() {
        let june = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        let records = vec![
            enriched(june, 70.0, None, 71.5),
            enriched(june + chrono::Days::new(1), 70.0, None, 70.7),
            enriched(june + chrono::Days::new(2), 70.0, None, 70.7),
        ];

        let series = ChartSeries::from_enriched(&records).unwrap();
        assert_eq!(
            series.budget,
            vec![(0.0, 71.5), (1.0, 71.5), (1.0, 70.7), (2.0, 70.7)]
        );
        assert_eq!(series.date_at(1.0), june + chrono::Days::new(1));
    }

    #[test]
    fn single_point_gets_non_degenerate_bounds() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let series = ChartSeries::from_enriched(&[enriched(date, 71.5, None, 71.5)]).unwrap();
        assert_eq!(series.x_bounds, [0.0, 1.0]);
        assert!(series.y_bounds[0] < 71.5 && series.y_bounds[1] > 71.5);
    }

    #[test]
    fn empty_sequence_has_no_series() {
        assert!(ChartSeries::from_enriched(&[]).is_none());
    }
}
