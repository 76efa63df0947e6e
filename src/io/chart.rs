//! Plotters-powered trend chart, rendered to SVG.
//!
//! The chart is drawn into an in-memory string and then persisted with
//! [`write_atomic`], so readers of the well-known chart path only ever see a
//! complete file. Concurrent trend answers sharing one path are last-writer-wins;
//! give each engine its own `chart_path` when per-request charts are needed.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use tracing::debug;

use crate::error::AppError;
use crate::io::export::write_atomic;

const CHART_SIZE: (u32, u32) = (720, 360);

/// Destination for trend charts.
///
/// The engine calls [`ChartWriter::write_trend`] exactly once per answered trend
/// question and reports the returned path back to the caller.
pub trait ChartWriter {
    fn write_trend(&self, title: &str, points: &[(NaiveDate, f64)]) -> Result<PathBuf, AppError>;
}

/// Writes trend charts as SVG to a fixed path, overwriting it on every call.
#[derive(Debug, Clone)]
pub struct SvgChartWriter {
    path: PathBuf,
}

impl SvgChartWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChartWriter for SvgChartWriter {
    fn write_trend(&self, title: &str, points: &[(NaiveDate, f64)]) -> Result<PathBuf, AppError> {
        let svg = render_trend_svg(title, points)?;
        write_atomic(&self.path, svg.as_bytes())?;
        debug!("Wrote trend chart with {} points to {}", points.len(), self.path.display());
        Ok(self.path.clone())
    }
}

/// Render a date/price line chart as an SVG document.
pub fn render_trend_svg(title: &str, points: &[(NaiveDate, f64)]) -> Result<String, AppError> {
    if points.is_empty() {
        return Err(AppError::new(3, "Cannot draw a trend chart without data points."));
    }

    let series: Vec<(f64, f64)> = points
        .iter()
        .map(|(d, p)| (d.num_days_from_ce() as f64, *p))
        .collect();
    let (x0, x1) = padded_bounds(series.iter().map(|p| p.0), 15.0);
    let (y0, y1) = padded_bounds(series.iter().map(|p| p.1), 1.0);

    let mut svg = String::new();
    let drawn: Result<(), Box<dyn std::error::Error>> = (|| {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 18))
            .margin(12)
            .set_label_area_size(LabelAreaPosition::Left, 64)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Price (₹/quintal)")
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&|v| fmt_month(*v))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .draw()?;

        let line_color = RGBColor(0x27, 0xae, 0x60);
        chart.draw_series(LineSeries::new(series.iter().copied(), &line_color))?;
        chart.draw_series(
            series
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, line_color.filled())),
        )?;

        root.present()?;
        Ok(())
    })();

    drawn.map_err(|e| AppError::new(4, format!("Failed to render trend chart: {e}")))?;
    Ok(svg)
}

/// Min/max of `values`, widened by 5% (or `min_pad` when the range is flat).
fn padded_bounds(values: impl Iterator<Item = f64>, min_pad: f64) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let pad = ((hi - lo) * 0.05).max(min_pad);
    (lo - pad, hi + pad)
}

fn fmt_month(days_from_ce: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(days_from_ce.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn renders_svg_document() {
        let points = vec![(ym(2024, 1), 1800.0), (ym(2024, 2), 2100.0), (ym(2024, 3), 1950.0)];
        let svg = render_trend_svg("Tomato Price Trend in Karnataka", &points).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Tomato Price Trend in Karnataka"));
    }

    #[test]
    fn single_point_still_renders() {
        let svg = render_trend_svg("Onion", &[(ym(2024, 6), 900.0)]).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn empty_series_is_rejected() {
        assert_eq!(render_trend_svg("x", &[]).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn flat_series_gets_padding() {
        let (lo, hi) = padded_bounds([5.0, 5.0].into_iter(), 1.0);
        assert!((lo - 4.0).abs() < 1e-12);
        assert!((hi - 6.0).abs() < 1e-12);
    }

    #[test]
    fn svg_writer_overwrites_fixed_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SvgChartWriter::new(dir.path().join("trend.svg"));
        let first = writer.write_trend("Alpha Chart", &[(ym(2024, 1), 1.0)]).unwrap();
        let second = writer.write_trend("Bravo Chart", &[(ym(2024, 2), 2.0)]).unwrap();
        assert_eq!(first, second);
        let body = std::fs::read_to_string(&second).unwrap();
        assert!(body.contains("Bravo Chart"));
        assert!(!body.contains("Alpha Chart"));
    }

    #[test]
    fn month_labels() {
        assert_eq!(fmt_month(ym(2024, 3).num_days_from_ce() as f64), "2024-03");
    }
}
