use super::error::{PlotError, Result};
use csv::{ReaderBuilder, Trim};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Cell contents treated as missing values (after trimming), pandas' default na_values
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// What to do with a plotted row that lacks an x or y value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValuePolicy {
    /// Exclude the row from the plot
    #[default]
    Skip,
    /// Abort with `PlotError::MissingValue`
    Fail,
}

impl MissingValuePolicy {
    /// Parse from string value
    ///
    /// Validation happens in the property registry; anything but "fail" skips.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fail" => Self::Fail,
            _ => Self::Skip,
        }
    }
}

/// Options for reading a delimited table
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// In-memory observation table parsed from a delimited file
///
/// Columns whose non-missing cells all parse as numbers are stored as Float64,
/// everything else as String. Missing cells are nulls.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    df: DataFrame,
    columns: Vec<String>,
}

impl ObservationTable {
    /// Read a table from a file on disk
    ///
    /// The file handle is released before this returns.
    pub fn from_path(path: &Path, options: &CsvOptions) -> Result<Self> {
        if !path.is_file() {
            return Err(PlotError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PlotError::FileNotFound(path.to_path_buf()),
            _ => PlotError::Io(e),
        })?;

        tracing::debug!(path = %path.display(), "reading observation table");
        Self::from_reader(file, options)
    }

    /// Parse a table from any reader
    pub fn from_reader<R: Read>(reader: R, options: &CsvOptions) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(options.delimiter)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| csv_error("Failed to read CSV headers", e))?
            .clone();
        if headers.is_empty() {
            return Err(PlotError::Parse("Input has no header row".to_string()));
        }

        let columns: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let mut seen = HashSet::new();
        for name in &columns {
            if name.is_empty() {
                return Err(PlotError::Parse("Header contains an empty column name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(PlotError::Parse(format!("Duplicate column '{}'", name)));
            }
        }

        // Column-major cell storage
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); columns.len()];
        for (idx, result) in reader.records().enumerate() {
            let record =
                result.map_err(|e| csv_error(&format!("Failed to parse data row {}", idx + 1), e))?;
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(parse_cell(field));
            }
        }

        let mut columns_vec = Vec::with_capacity(columns.len());
        for (name, values) in columns.iter().zip(cells) {
            columns_vec.push(build_series(name, values).into_column());
        }

        let df = DataFrame::new(columns_vec)
            .map_err(|e| PlotError::Parse(format!("Failed to build table: {}", e)))?;

        tracing::debug!(rows = df.height(), columns = ?columns, "observation table parsed");
        Ok(Self { df, columns })
    }

    /// Number of data rows
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Whether a column was stored as numeric
    pub fn is_numeric(&self, name: &str) -> bool {
        self.df
            .column(name)
            .map(|c| c.dtype() == &DataType::Float64)
            .unwrap_or(false)
    }

    /// Extract (x, y) pairs for plotting
    ///
    /// Both columns must exist and be numeric. Rows with a null in either
    /// column are skipped or rejected according to `policy`.
    pub fn numeric_pairs(
        &self,
        x: &str,
        y: &str,
        policy: MissingValuePolicy,
    ) -> Result<Vec<(f64, f64)>> {
        let xs = self.numeric_column(x)?;
        let ys = self.numeric_column(y)?;

        let mut pairs = Vec::with_capacity(xs.len());
        let mut skipped = 0usize;
        for (idx, (xv, yv)) in xs.into_iter().zip(ys).enumerate() {
            match (xv, yv) {
                (Some(xv), Some(yv)) => pairs.push((xv, yv)),
                (xv, _) if policy == MissingValuePolicy::Fail => {
                    let column = if xv.is_none() { x } else { y };
                    return Err(PlotError::MissingValue {
                        column: column.to_string(),
                        row: idx + 1,
                    });
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::info!(skipped, "excluded rows with missing values");
        }
        Ok(pairs)
    }

    fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        if !self.has_column(name) {
            return Err(PlotError::MissingColumn {
                column: name.to_string(),
                available: self.columns.clone(),
            });
        }

        let column = self
            .df
            .column(name)
            .map_err(|e| PlotError::Parse(format!("Column '{}': {}", name, e)))?;
        let values = column
            .f64()
            .map_err(|_| PlotError::Parse(format!("Column '{}' is not numeric", name)))?;

        Ok(values.iter().collect())
    }
}

fn parse_cell(field: &str) -> Option<String> {
    if MISSING_TOKENS.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Float64 when every present cell is a number, String otherwise
///
/// Non-finite numbers (`inf`, `NAN`, `-Infinity`, ...) become nulls.
fn build_series(name: &str, values: Vec<Option<String>>) -> Series {
    let numeric: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            Some(s) => s
                .parse::<f64>()
                .ok()
                .map(|v| if v.is_finite() { Some(v) } else { None }),
            None => Some(None),
        })
        .collect();

    match numeric {
        Some(floats) => Series::new(name.into(), floats),
        None => Series::new(name.into(), values),
    }
}

fn csv_error(context: &str, err: csv::Error) -> PlotError {
    if !err.is_io_error() {
        return PlotError::Parse(format!("{}: {}", context, err));
    }
    match err.into_kind() {
        csv::ErrorKind::Io(io) => PlotError::Io(io),
        other => PlotError::Parse(format!("{}: {:?}", context, other)),
    }
}

/// Summary statistics for plotted points
#[derive(Debug, Clone)]
pub struct DataSummary {
    pub total_rows: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DataSummary {
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        DataSummary {
            total_rows: pairs.len(),
            x_min: pairs.iter().map(|p| p.0).fold(f64::INFINITY, f64::min),
            x_max: pairs.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max),
            y_min: pairs.iter().map(|p| p.1).fold(f64::INFINITY, f64::min),
            y_max: pairs.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl std::fmt::Display for DataSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DataSummary {{ rows: {}, x: [{:.2}, {:.2}], y: [{:.2}, {:.2}] }}",
            self.total_rows, self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const THREE_ROWS: &str = "CrimeRate,HousePrice\n1.0,100000\n2.0,90000\n3.0,80000";

    fn parse(data: &str) -> Result<ObservationTable> {
        ObservationTable::from_reader(data.as_bytes(), &CsvOptions::default())
    }

    #[test]
    fn test_three_row_table() {
        let table = parse(THREE_ROWS).unwrap();
        assert_eq!(table.height(), 3);
        assert_eq!(table.columns(), &["CrimeRate", "HousePrice"]);

        let pairs = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap();
        assert_eq!(pairs, vec![(1.0, 100000.0), (2.0, 90000.0), (3.0, 80000.0)]);
    }

    #[test]
    fn test_missing_column() {
        let table = parse("CrimeRate,Name\n1.0,a\n").unwrap();
        let err = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap_err();
        match err {
            PlotError::MissingColumn { column, available } => {
                assert_eq!(column, "HousePrice");
                assert_eq!(available, vec!["CrimeRate", "Name"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_values_skipped() {
        let data = "CrimeRate,HousePrice\n1.0,100\nNA,200\n3.0,\n4.0,400\n";
        let table = parse(data).unwrap();
        assert_eq!(table.height(), 4);

        let pairs = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap();
        assert_eq!(pairs, vec![(1.0, 100.0), (4.0, 400.0)]);
    }

    #[test]
    fn test_missing_values_fail() {
        let data = "CrimeRate,HousePrice\n1.0,100\n2.0,NaN\n";
        let table = parse(data).unwrap();
        let err = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Fail)
            .unwrap_err();
        match err {
            PlotError::MissingValue { column, row } => {
                assert_eq!(column, "HousePrice");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_non_finite_values_are_missing() {
        let data = "CrimeRate,HousePrice\n1.0,100\nNAN,200\ninf,300\n4.0,-Infinity\n";
        let table = parse(data).unwrap();
        assert!(table.is_numeric("CrimeRate"));
        assert!(table.is_numeric("HousePrice"));

        let pairs = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap();
        assert_eq!(pairs, vec![(1.0, 100.0)]);

        let err = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Fail)
            .unwrap_err();
        match err {
            PlotError::MissingValue { column, row } => {
                assert_eq!(column, "CrimeRate");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_pandas_missing_tokens() {
        let data = "CrimeRate,HousePrice\n1.0,100\nn/a,200\n<NA>,300\n#N/A,400\n-nan,500\n1.#QNAN,600\n7.0,#NA\n";
        let table = parse(data).unwrap();
        assert!(table.is_numeric("CrimeRate"));

        let pairs = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap();
        assert_eq!(pairs, vec![(1.0, 100.0)]);
    }

    #[test]
    fn test_non_numeric_column() {
        let table = parse("CrimeRate,HousePrice\n1.0,cheap\n").unwrap();
        assert!(!table.is_numeric("HousePrice"));
        let err = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap_err();
        assert!(matches!(err, PlotError::Parse(_)));
    }

    #[test]
    fn test_extra_string_columns_kept() {
        let data = "HousePrice,CrimeRate,Name\n140463,29.7,Abington\n113033,24.1,Ambler\n";
        let table = parse(data).unwrap();
        assert!(table.is_numeric("CrimeRate"));
        assert!(!table.is_numeric("Name"));

        let pairs = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap();
        assert_eq!(pairs, vec![(29.7, 140463.0), (24.1, 113033.0)]);
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let err = parse("CrimeRate,HousePrice\n1.0,100\n2.0\n").unwrap_err();
        assert!(matches!(err, PlotError::Parse(_)));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, PlotError::Parse(_)));
    }

    #[test]
    fn test_duplicate_header_is_parse_error() {
        let err = parse("CrimeRate,CrimeRate\n1,2\n").unwrap_err();
        assert!(matches!(err, PlotError::Parse(_)));
    }

    #[test]
    fn test_header_only_table() {
        let table = parse("CrimeRate,HousePrice\n").unwrap();
        assert_eq!(table.height(), 0);
        let pairs = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Fail)
            .unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_custom_delimiter_and_whitespace() {
        let options = CsvOptions { delimiter: b';' };
        let data = " CrimeRate ; HousePrice \n 1.5 ; 200 \n";
        let table = ObservationTable::from_reader(data.as_bytes(), &options).unwrap();
        let pairs = table
            .numeric_pairs("CrimeRate", "HousePrice", MissingValuePolicy::Skip)
            .unwrap();
        assert_eq!(pairs, vec![(1.5, 200.0)]);
    }

    #[test]
    fn test_from_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = ObservationTable::from_path(&path, &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, PlotError::FileNotFound(p) if p == path));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(THREE_ROWS.as_bytes()).unwrap();

        let table = ObservationTable::from_path(file.path(), &CsvOptions::default()).unwrap();
        assert_eq!(table.height(), 3);
    }

    #[test]
    fn test_summary() {
        let summary = DataSummary::from_pairs(&[(1.0, 100000.0), (3.0, 80000.0)]);
        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.x_min, 1.0);
        assert_eq!(summary.x_max, 3.0);
        assert_eq!(summary.y_min, 80000.0);
        assert_eq!(summary.y_max, 100000.0);
    }
}
