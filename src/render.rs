//! Scatter plot rendering with plotters
//!
//! `ScatterSpec` holds everything needed to draw: the points, labels and
//! canvas size. Building it is separate from drawing so the point set can be
//! checked without touching a backend.

use crate::config::OutputFormat;
use crate::table::{PlotError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// Fraction of the data span added on each side of an axis
const AXIS_MARGIN: f64 = 0.05;

/// Seaborn's default blue
const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Fully resolved scatter plot
#[derive(Debug, Clone)]
pub struct ScatterSpec {
    pub points: Vec<ScatterPoint>,
    pub x_label: String,
    pub y_label: String,
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    pub point_size: u32,
    pub format: OutputFormat,
}

impl ScatterSpec {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_range(&self) -> Range<f64> {
        axis_range(self.points.iter().map(|p| p.x))
    }

    pub fn y_range(&self) -> Range<f64> {
        axis_range(self.points.iter().map(|p| p.y))
    }
}

/// Data range padded by `AXIS_MARGIN` on each side
///
/// A single distinct value widens to ±max(1, 5% of its magnitude); no values
/// gives [0, 1].
pub fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0..1.0;
    }

    let span = max - min;
    if span == 0.0 {
        let pad = (min.abs() * AXIS_MARGIN).max(1.0);
        return (min - pad)..(max + pad);
    }

    let pad = span * AXIS_MARGIN;
    (min - pad)..(max + pad)
}

/// Render the scatter plot to `path`
pub fn render(spec: &ScatterSpec, path: &Path) -> Result<()> {
    let size = (spec.width, spec.height);
    tracing::debug!(
        path = %path.display(),
        width = spec.width,
        height = spec.height,
        points = spec.len(),
        "rendering scatter plot"
    );

    match spec.format {
        OutputFormat::Png => draw(BitMapBackend::new(path, size).into_drawing_area(), spec),
        OutputFormat::Svg => draw(SVGBackend::new(path, size).into_drawing_area(), spec),
    }
}

fn draw<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, spec: &ScatterSpec) -> Result<()> {
    root.fill(&WHITE).map_err(render_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90);
    if let Some(title) = &spec.title {
        builder.caption(title, ("sans-serif", 24));
    }

    let mut chart = builder
        .build_cartesian_2d(spec.x_range(), spec.y_range())
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(render_error)?;

    let radius = spec.point_size;
    chart
        .draw_series(
            spec.points
                .iter()
                .map(|p| Circle::new((p.x, p.y), radius, POINT_COLOR.mix(0.8).filled())),
        )
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

fn render_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(points: &[(f64, f64)]) -> ScatterSpec {
        ScatterSpec {
            points: points.iter().map(|&(x, y)| ScatterPoint { x, y }).collect(),
            x_label: "CrimeRate".to_string(),
            y_label: "HousePrice".to_string(),
            title: None,
            width: 1000,
            height: 600,
            point_size: 4,
            format: OutputFormat::Png,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_axis_range_padding() {
        let s = spec(&[(1.0, 100000.0), (2.0, 90000.0), (3.0, 80000.0)]);

        let x = s.x_range();
        assert_close(x.start, 0.9);
        assert_close(x.end, 3.1);

        let y = s.y_range();
        assert_close(y.start, 79000.0);
        assert_close(y.end, 101000.0);
    }

    #[test]
    fn test_axis_range_single_value() {
        let r = axis_range([5.0].into_iter());
        assert_close(r.start, 4.0);
        assert_close(r.end, 6.0);

        let r = axis_range([100000.0, 100000.0].into_iter());
        assert_close(r.start, 95000.0);
        assert_close(r.end, 105000.0);
    }

    #[test]
    fn test_axis_range_empty() {
        let r = axis_range(std::iter::empty());
        assert_eq!(r, 0.0..1.0);
        assert!(spec(&[]).is_empty());
    }

    #[test]
    fn test_axis_range_ignores_non_finite() {
        let r = axis_range([f64::INFINITY, 0.0, 10.0].into_iter());
        assert_close(r.start, -0.5);
        assert_close(r.end, 10.5);
    }
}
