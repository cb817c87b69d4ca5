//! Plot generation pipeline
//!
//! The pipeline:
//! 1. Loads the observation table from the configured input path
//! 2. Extracts the (x, y) points, validating columns and missing values
//! 3. Renders the scatter plot to the output path
//!
//! Every failure in steps 1-2 happens before a drawing backend is created,
//! so a bad input never leaves a partial image behind.

use crate::config::{OutputFormat, PlotConfig};
use crate::render::{self, ScatterPoint, ScatterSpec};
use crate::table::{CsvOptions, DataSummary, ObservationTable, Result};
use std::path::PathBuf;

/// Outcome of a successful render
#[derive(Debug, Clone)]
pub struct PlotResult {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub n_points: usize,
}

/// Read the configured input table
pub fn load_table(config: &PlotConfig) -> Result<ObservationTable> {
    let options = CsvOptions {
        delimiter: config.delimiter,
    };
    ObservationTable::from_path(&config.input_path, &options)
}

/// Load and validate the input, producing the scatter plot to draw
pub fn prepare_scatter(config: &PlotConfig) -> Result<ScatterSpec> {
    println!("[1/3] Loading data from {}...", config.input_path.display());
    let table = load_table(config)?;
    println!(
        "✓ Loaded {} rows, {} columns",
        table.height(),
        table.columns().len()
    );

    println!(
        "[2/3] Extracting points (x: {}, y: {})...",
        config.x_column, config.y_column
    );
    let pairs = table.numeric_pairs(&config.x_column, &config.y_column, config.missing_values)?;
    if pairs.len() < table.height() {
        println!(
            "  Excluded {} row(s) with missing values",
            table.height() - pairs.len()
        );
    }
    if !pairs.is_empty() {
        println!("  {}", DataSummary::from_pairs(&pairs));
    }

    let (width, height) = config.figure.pixels();
    Ok(ScatterSpec {
        points: pairs
            .into_iter()
            .map(|(x, y)| ScatterPoint { x, y })
            .collect(),
        x_label: config.x_column.clone(),
        y_label: config.y_column.clone(),
        title: config.plot_title.clone(),
        width,
        height,
        point_size: config.point_size,
        format: config.output_format,
    })
}

/// Generate the scatter plot described by `config`
pub fn generate_plot(config: &PlotConfig) -> Result<PlotResult> {
    let spec = prepare_scatter(config)?;

    println!(
        "[3/3] Rendering {} point(s) to {}...",
        spec.len(),
        config.output_path.display()
    );
    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    render::render(&spec, &config.output_path)?;

    Ok(PlotResult {
        output_path: config.output_path.clone(),
        format: spec.format,
        width: spec.width,
        height: spec.height,
        n_points: spec.len(),
    })
}
