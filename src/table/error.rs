use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the observation table or rendering the plot
#[derive(Debug, Error)]
pub enum PlotError {
    /// Input path does not resolve to a file
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input is not a valid delimited table
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required column is absent from the header
    #[error("Missing column '{column}' (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A plotted row has no value in a required column (fail policy only)
    #[error("Missing value in column '{column}' at data row {row}")]
    MissingValue { column: String, row: usize },

    /// I/O error other than a missing file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing backend error
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
