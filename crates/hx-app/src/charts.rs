//! Chart rendering for summaries and per-case series.
//!
//! Charts are SVG so rendering needs no system fonts or image codecs.
//! A failed chart is reported, never fatal to the run that asked for it.

use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

use hx_series::TimeSeries;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use tracing::warn;

pub const TIME_AXIS_LABEL: &str = "Iteration / pseudo-time";

type DrawResult = Result<(), Box<dyn Error>>;

#[derive(Debug, thiserror::Error)]
#[error("Failed to render chart {path}: {message}")]
pub struct ReportError {
    pub path: PathBuf,
    pub message: String,
}

/// Charts written and charts that failed during one service call.
#[derive(Debug, Default)]
pub struct ChartReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<ReportError>,
}

impl ChartReport {
    /// Record the outcome of rendering one chart.
    pub fn record(&mut self, outcome: Result<PathBuf, ReportError>) {
        match outcome {
            Ok(path) => self.written.push(path),
            Err(err) => {
                warn!(error = %err, "chart not written");
                self.failed.push(err);
            }
        }
    }
}

/// One cell of the dashboard grid. `series: None` renders a MISSING panel.
pub struct DashboardPanel<'a> {
    pub title: &'a str,
    pub y_label: &'a str,
    pub series: Option<&'a TimeSeries>,
}

pub fn line_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    series: &TimeSeries,
) -> Result<PathBuf, ReportError> {
    finish(path, draw_line(path, title, y_label, series))
}

pub fn bar_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    labels: &[&str],
    values: &[Option<f64>],
) -> Result<PathBuf, ReportError> {
    finish(path, draw_bars(path, title, y_label, labels, values))
}

/// Scatter of `(x, y, label)` points, each annotated with its label.
pub fn scatter_chart(
    path: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64, String)],
) -> Result<PathBuf, ReportError> {
    finish(path, draw_scatter(path, title, x_label, y_label, points))
}

/// 2x3 grid of series panels under a common title.
pub fn dashboard(
    path: &Path,
    title: &str,
    panels: &[DashboardPanel<'_>],
) -> Result<PathBuf, ReportError> {
    finish(path, draw_dashboard(path, title, panels))
}

fn finish(path: &Path, result: DrawResult) -> Result<PathBuf, ReportError> {
    result
        .map(|_| path.to_path_buf())
        .map_err(|e| ReportError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn draw_line(path: &Path, title: &str, y_label: &str, series: &TimeSeries) -> DrawResult {
    let root = SVGBackend::new(path, (900, 540)).into_drawing_area();
    root.fill(&WHITE)?;
    draw_series_panel(&root, title, y_label, series, 20.0)?;
    root.present()?;
    Ok(())
}

fn draw_series_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    title: &str,
    y_label: &str,
    series: &TimeSeries,
    font_size: f64,
) -> DrawResult {
    let x_range = padded_range(series.time_range());
    let y_range = padded_range(series.value_range());

    let mut chart = ChartBuilder::on(area)
        .caption(title, font(font_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(TIME_AXIS_LABEL)
        .y_desc(y_label)
        .draw()?;

    chart.draw_series(LineSeries::new(
        series
            .points()
            .filter(|(t, v)| t.is_finite() && v.is_finite()),
        &BLUE,
    ))?;
    Ok(())
}

fn draw_missing_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, title: &str) -> DrawResult {
    let mut chart = ChartBuilder::on(area)
        .caption(format!("{title} (MISSING)"), font(16.0))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0f64..1.0, 0.0f64..1.0)?;

    chart.configure_mesh().draw()?;
    Ok(())
}

fn draw_dashboard(path: &Path, title: &str, panels: &[DashboardPanel<'_>]) -> DrawResult {
    let root = SVGBackend::new(path, (1400, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(title, font(24.0))?;

    for (area, panel) in body.split_evenly((2, 3)).iter().zip(panels) {
        match panel.series {
            Some(series) => draw_series_panel(area, panel.title, panel.y_label, series, 16.0)?,
            None => draw_missing_panel(area, panel.title)?,
        }
    }

    root.present()?;
    Ok(())
}

fn draw_bars(
    path: &Path,
    title: &str,
    y_label: &str,
    labels: &[&str],
    values: &[Option<f64>],
) -> DrawResult {
    let finite: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    // Bars grow from zero, so zero is always in view.
    let lo = finite.iter().copied().fold(0.0f64, f64::min);
    let hi = finite.iter().copied().fold(0.0f64, f64::max);
    let y_range = padded_range(Some((lo, hi)));
    let n = labels.len().max(1);

    let root = SVGBackend::new(path, (1000, 460)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, font(20.0))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_range)?;

    let label_at = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).map(|s| s.to_string()).unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label_at)
        .y_desc(y_label)
        .draw()?;

    chart.draw_series(values.iter().enumerate().filter_map(|(i, v)| {
        let v = (*v).filter(|v| v.is_finite())?;
        let x = i as f64;
        Some(Rectangle::new([(x - 0.35, 0.0), (x + 0.35, v)], BLUE.filled()))
    }))?;

    root.present()?;
    Ok(())
}

fn draw_scatter(
    path: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64, String)],
) -> DrawResult {
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let x_range = padded_range(finite_bounds(&xs));
    let y_range = padded_range(finite_bounds(&ys));

    let root = SVGBackend::new(path, (700, 580)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, font(20.0))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    chart.draw_series(points.iter().map(|(x, y, label)| {
        EmptyElement::at((*x, *y))
            + Circle::new((0, 0), 4, BLUE.filled())
            + Text::new(label.clone(), (6, -6), font(12.0))
    }))?;

    root.present()?;
    Ok(())
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

fn finite_bounds(xs: &[f64]) -> Option<(f64, f64)> {
    xs.iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

/// Axis range around `(lo, hi)` with 5% padding; unit range when unknown.
fn padded_range(bounds: Option<(f64, f64)>) -> Range<f64> {
    let Some((lo, hi)) = bounds else {
        return 0.0..1.0;
    };
    let span = hi - lo;
    let pad = if span.abs() < 1e-12 {
        lo.abs().max(1.0) * 0.05
    } else {
        span * 0.05
    };
    (lo - pad)..(hi + pad)
}
