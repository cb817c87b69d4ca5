//! Plot configuration from plot properties
//!
//! All default values come from plot.json - no hardcoded fallbacks in this code.
//! Command-line overrides are applied through the `PropertyReader` before the
//! config is built.

use crate::table::{MissingValuePolicy, PlotError, PropertyReader, Result};
use std::path::{Path, PathBuf};

/// Image format of the rendered plot, selected by the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => Err(PlotError::Config(format!(
                "Unsupported output file '{}', expected a .png or .svg extension",
                path.display()
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Figure size in inches at a given resolution
///
/// The default 10×6 canvas at 100 dpi renders to 1000×600 pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl FigureSize {
    /// Resolve to (width, height) in pixels
    pub fn pixels(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }
}

#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Delimited input table
    pub input_path: PathBuf,

    /// Field separator of the input table
    pub delimiter: u8,

    /// Rendered image path
    pub output_path: PathBuf,

    /// Derived from the output path extension
    pub output_format: OutputFormat,

    /// Column plotted on the x-axis (also the x-axis label)
    pub x_column: String,

    /// Column plotted on the y-axis (also the y-axis label)
    pub y_column: String,

    /// Plot title (optional)
    pub plot_title: Option<String>,

    /// What to do with rows missing an x or y value
    pub missing_values: MissingValuePolicy,

    pub figure: FigureSize,

    /// Marker radius in pixels
    pub point_size: u32,
}

impl PlotConfig {
    /// Create config from plot properties
    pub fn from_properties(props: &PropertyReader) -> Result<Self> {
        let input_path = PathBuf::from(props.get_string("input.path"));
        let delimiter = props.get_char("input.delimiter");

        let output_path = PathBuf::from(props.get_string("output.path"));
        let output_format = OutputFormat::from_path(&output_path)?;

        let x_column = props.get_string("column.x");
        let y_column = props.get_string("column.y");
        if x_column.is_empty() || y_column.is_empty() {
            return Err(PlotError::Config(
                "Both column.x and column.y must name a column".to_string(),
            ));
        }

        let plot_title = props.get_optional_string("plot.title");

        let missing_values = MissingValuePolicy::parse(&props.get_enum("missing.values"));

        let figure = FigureSize {
            width_in: props.get_f64_in_range("figure.width", 1.0, 100.0),
            height_in: props.get_f64_in_range("figure.height", 1.0, 100.0),
            dpi: props.get_u32_in_range("figure.dpi", 10, 1000),
        };

        let point_size = props.get_u32_in_range("point.size", 1, 50);

        Ok(Self {
            input_path,
            delimiter,
            output_path,
            output_format,
            x_column,
            y_column,
            plot_title,
            missing_values,
            figure,
            point_size,
        })
    }

    /// Defaults from plot.json with no user overrides
    pub fn from_defaults() -> Result<Self> {
        Self::from_properties(&PropertyReader::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlotConfig::from_defaults().unwrap();
        assert_eq!(config.x_column, "CrimeRate");
        assert_eq!(config.y_column, "HousePrice");
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.missing_values, MissingValuePolicy::Skip);
        assert_eq!(config.plot_title, None);
        assert_eq!(config.figure.pixels(), (1000, 600));
        assert_eq!(config.point_size, 4);
        assert!(config
            .input_path
            .ends_with("Philadelphia_Crime_Rate_noNA.csv"));
    }

    #[test]
    fn test_overrides() {
        let mut props = PropertyReader::new();
        props.set("output.path", "out/plot.SVG");
        props.set("missing.values", "fail");
        props.set("figure.dpi", "200");
        props.set("point.size", "7");

        let config = PlotConfig::from_properties(&props).unwrap();
        assert_eq!(config.output_format, OutputFormat::Svg);
        assert_eq!(config.missing_values, MissingValuePolicy::Fail);
        assert_eq!(config.figure.pixels(), (2000, 1200));
        assert_eq!(config.point_size, 7);
    }

    #[test]
    fn test_unsupported_output_extension() {
        let mut props = PropertyReader::new();
        props.set("output.path", "plot.jpg");
        let err = PlotConfig::from_properties(&props).unwrap_err();
        assert!(matches!(err, PlotError::Config(_)));

        assert!(OutputFormat::from_path(Path::new("plot")).is_err());
    }

    #[test]
    fn test_figure_pixels_rounding() {
        let figure = FigureSize {
            width_in: 6.4,
            height_in: 4.8,
            dpi: 72,
        };
        assert_eq!(figure.pixels(), (461, 346));
    }
}
