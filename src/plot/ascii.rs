//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - daily PR points by GHI bucket: `.` very low, `-` low, `o` moderate, `#` high
//! - trailing PR average: `*`
//! - budget PR step line: `=`

use crate::domain::{EnrichedRecord, GhiBucket};
use crate::plot::ChartSeries;

/// Render a plot for an enriched sequence.
pub fn render_ascii_plot(enriched: &[EnrichedRecord], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(series) = ChartSeries::from_enriched(enriched) else {
        return "Plot: no records\n".to_string();
    };
    let [_, t_max] = series.x_bounds;
    let [y_min, y_max] = series.y_bounds;
    let to_cell = |&(t, y): &(f64, f64)| (map_x(t, t_max, width), map_y(y, y_min, y_max, height));

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so points overlay them.
    let budget: Vec<(usize, usize)> = series.budget.iter().map(to_cell).collect();
    draw_polyline(&mut grid, &budget, '=');

    for segment in &series.trailing {
        let cells: Vec<(usize, usize)> = segment.iter().map(to_cell).collect();
        draw_polyline(&mut grid, &cells, '*');
    }

    for (bucket, points) in &series.points {
        for point in points {
            let (x, y) = to_cell(point);
            grid[y][x] = bucket_glyph(*bucket);
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{}, {}] | PR=[{y_min:.2}, {y_max:.2}]\n",
        series.first_date, series.last_date
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("Legend: . very low  - low  o moderate  # high  * trailing avg  = budget\n");

    out
}

pub fn bucket_glyph(bucket: GhiBucket) -> char {
    match bucket {
        GhiBucket::VeryLow => '.',
        GhiBucket::Low => '-',
        GhiBucket::Moderate => 'o',
        GhiBucket::High => '#',
    }
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], cells: &[(usize, usize)], ch: char) {
    let mut prev = None;
    for &(x, y) in cells {
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, y, ch),
            None if grid[y][x] == ' ' => grid[y][x] = ch,
            None => {}
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish); only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRecord;
    use chrono::NaiveDate;

    fn enriched(date: NaiveDate, ghi: f64, pr: f64) -> EnrichedRecord {
        EnrichedRecord {
            record: DailyRecord { date, ghi, pr },
            ghi_bucket: GhiBucket::classify(ghi),
            pr_trailing_avg: None,
            fiscal_year_index: 3,
            budget_pr: 71.5,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let points = vec![
            enriched(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 1.0, 70.0),
            enriched(NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(), 7.0, 80.0),
        ];

        let txt = render_ascii_plot(&points, 10, 5);
        let expected = concat!(
            "Plot: dates=[2023-01-01, 2023-01-03] | PR=[69.50, 80.50]\n",
            "         #\n",
            "          \n",
            "          \n",
            "==========\n",
            ".         \n",
            "Legend: . very low  - low  o moderate  # high  * trailing avg  = budget\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_input_renders_placeholder() {
        assert_eq!(render_ascii_plot(&[], 10, 5), "Plot: no records\n");
    }
}
