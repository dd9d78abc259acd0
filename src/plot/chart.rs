//! Plotters-powered evaluation chart, written as SVG.
//!
//! Layout follows the classic PR evaluation chart:
//! - daily PR scatter colored by GHI bucket
//! - trailing PR average (red) and budget PR step line (dark green)
//! - trailing/lifetime means in the bottom-right corner of the plot area
//! - above-budget share centered under the chart

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::{DeriveConfig, EnrichedRecord, GhiBucket, SummaryStats};
use crate::error::AppError;
use crate::plot::ChartSeries;
use crate::report::{format_above_budget, format_trailing_means};

pub const CHART_SIZE: (u32, u32) = (1400, 700);

const TRAILING_COLOR: RGBColor = RGBColor(255, 0, 0);
const BUDGET_COLOR: RGBColor = RGBColor(0, 100, 0);

pub fn bucket_color(bucket: GhiBucket) -> RGBColor {
    match bucket {
        GhiBucket::VeryLow => RGBColor(0, 0, 128),    // navy
        GhiBucket::Low => RGBColor(173, 216, 230),    // light blue
        GhiBucket::Moderate => RGBColor(255, 165, 0), // orange
        GhiBucket::High => RGBColor(165, 42, 42),     // brown
    }
}

/// Draw the evaluation chart to an SVG file.
pub fn write_svg_chart(
    path: &Path,
    enriched: &[EnrichedRecord],
    summary: &SummaryStats,
    config: &DeriveConfig,
) -> Result<(), AppError> {
    let series = ChartSeries::from_enriched(enriched).ok_or_else(|| AppError::render("No records to chart."))?;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let [x0, x1] = series.x_bounds;
    let [y0, y1] = series.y_bounds;

    let mut chart = ChartBuilder::on(&root)
        .caption("Performance Ratio Evaluation", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;

    let fmt_x = |v: &f64| series.date_at(*v).format("%Y-%m").to_string();
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Performance Ratio (%)")
        .x_labels(10)
        .y_labels(8)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()
        .map_err(render_err)?;

    for (bucket, points) in &series.points {
        let color = bucket_color(*bucket);
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.mix(0.8).filled())))
            .map_err(render_err)?
            .label(format!("Daily PR ({})", bucket.range_label()))
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    for (idx, segment) in series.trailing.iter().enumerate() {
        let anno = chart
            .draw_series(LineSeries::new(segment.iter().copied(), TRAILING_COLOR.stroke_width(2)))
            .map_err(render_err)?;
        // One legend entry however many segments there are.
        if idx == 0 {
            anno.label(format!("{} day moving avg (PR)", config.window_size))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], TRAILING_COLOR.stroke_width(2)));
        }
    }

    chart
        .draw_series(LineSeries::new(series.budget.iter().copied(), BUDGET_COLOR.stroke_width(2)))
        .map_err(render_err)?
        .label("Target Budget PR")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BUDGET_COLOR.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    // Summary block anchored at the bottom-right of the plotting area.
    let (right, bottom) = chart.backend_coord(&(x1, y0));
    let summary_style = TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Right, VPos::Bottom));
    let lines: Vec<String> = format_trailing_means(summary).lines().map(str::to_string).collect();
    for (i, line) in lines.iter().rev().enumerate() {
        let y = bottom - 8 - (i as i32) * 18;
        root.draw(&Text::new(line.clone(), (right - 8, y), summary_style.clone()))
            .map_err(render_err)?;
    }

    let (width, height) = CHART_SIZE;
    let footer_style = TextStyle::from(("sans-serif", 16).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    root.draw(&Text::new(
        format_above_budget(summary),
        (width as i32 / 2, height as i32 - 8),
        footer_style,
    ))
    .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

fn render_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(e.to_string())
}
