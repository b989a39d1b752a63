//! Loader for rheometer measurement CSV files.
//!
//! Instrument exports are Latin-1 encoded and carry a fixed column contract:
//! a phase label column plus tip displacement, force, and current-size
//! columns (micrometers / microNewtons). Columns are located by exact
//! header name; anything else in the file is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use encoding_rs::mem::decode_latin1;
use thiserror::Error;

/// Phase/cycle label column.
pub const LABEL_COLUMN: &str = "Cycle";
/// Probe tip displacement column, in micrometers.
pub const DISPLACEMENT_COLUMN: &str = "ZTip Displacement(um)";
/// Measured force column, in microNewtons.
pub const FORCE_COLUMN: &str = "ZForce(uN)";
/// Reference sample size column, in micrometers.
pub const SIZE_COLUMN: &str = "Current Size (um)";

/// Errors that can occur during measurement file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Column-oriented store for one measurement file.
///
/// Rows are ordered by acquisition time; all columns have equal length.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    /// Raw phase labels, one per row (trimming happens during segmentation).
    pub labels: Vec<String>,
    /// Tip displacement per row, micrometers.
    pub displacement_um: Vec<f64>,
    /// Measured force per row, microNewtons.
    pub force_un: Vec<f64>,
    /// Reference sample size per row, micrometers.
    pub size_um: Vec<f64>,
    /// Source file path.
    pub source_path: Option<PathBuf>,
}

impl MeasurementTable {
    /// Returns the number of measurement rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Load a rheometer measurement CSV file.
///
/// The file is read as raw bytes and decoded as Latin-1 before CSV parsing,
/// matching the instrument export encoding. A header-only file loads as an
/// empty table; the batch driver then skips it for lack of cycles.
///
/// # Arguments
///
/// * `path` - Path to the measurement CSV file
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is
/// missing from the header, or a numeric field fails to parse.
pub fn load_measurement_csv<P: AsRef<Path>>(path: P) -> Result<MeasurementTable> {
    let path = path.as_ref();
    let raw = fs::read(path)?;
    let text = decode_latin1(&raw);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let find_column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| LoaderError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })
    };

    let label_idx = find_column(LABEL_COLUMN)?;
    let disp_idx = find_column(DISPLACEMENT_COLUMN)?;
    let force_idx = find_column(FORCE_COLUMN)?;
    let size_idx = find_column(SIZE_COLUMN)?;

    let mut labels = Vec::new();
    let mut displacement_um = Vec::new();
    let mut force_un = Vec::new();
    let mut size_um = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;

        labels.push(record.get(label_idx).unwrap_or("").to_string());
        displacement_um.push(parse_field(&record, disp_idx, row_no, DISPLACEMENT_COLUMN)?);
        force_un.push(parse_field(&record, force_idx, row_no, FORCE_COLUMN)?);
        size_um.push(parse_field(&record, size_idx, row_no, SIZE_COLUMN)?);
    }

    Ok(MeasurementTable {
        labels,
        displacement_um,
        force_un,
        size_um,
        source_path: Some(path.to_path_buf()),
    })
}

fn parse_field(record: &csv::StringRecord, idx: usize, row: usize, column: &str) -> Result<f64> {
    let value = record.get(idx).unwrap_or("");
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| LoaderError::BadNumber {
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const HEADER: &str = "Cycle,ZTip Displacement(um),ZForce(uN),Current Size (um)";

    #[test]
    fn test_load_measurement_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "test.csv",
            &format!("{HEADER}\n1: Compress,0.5,1.5,10.0\nHold,0.6,1.4,10.0\n"),
        );

        let table = load_measurement_csv(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.labels[0], "1: Compress");
        assert_eq!(table.displacement_um, vec![0.5, 0.6]);
        assert_eq!(table.force_un, vec![1.5, 1.4]);
        assert_eq!(table.size_um, vec![10.0, 10.0]);
    }

    #[test]
    fn test_load_latin1_labels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.csv");

        // 0xE9 is 'e' acute in Latin-1 and invalid as standalone UTF-8.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(HEADER.as_bytes());
        bytes.extend_from_slice(b"\nApproach \xe9,0.0,0.0,10.0\n");
        fs::write(&path, bytes).unwrap();

        let table = load_measurement_csv(&path).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.labels[0], "Approach \u{e9}");
    }

    #[test]
    fn test_load_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "bad.csv",
            "Cycle,ZTip Displacement(um),ZForce(uN)\n1: Compress,0.5,1.5\n",
        );

        let result = load_measurement_csv(&path);

        match result.unwrap_err() {
            LoaderError::MissingColumn { column, .. } => {
                assert_eq!(column, SIZE_COLUMN);
            }
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_load_bad_number() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "bad.csv",
            &format!("{HEADER}\n1: Compress,not-a-number,1.5,10.0\n"),
        );

        let result = load_measurement_csv(&path);

        match result.unwrap_err() {
            LoaderError::BadNumber { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, DISPLACEMENT_COLUMN);
                assert_eq!(value, "not-a-number");
            }
            other => panic!("Expected BadNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_load_header_only_is_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "empty.csv", &format!("{HEADER}\n"));

        let table = load_measurement_csv(&path).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_whitespace_tolerant_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "spaces.csv",
            &format!("{HEADER}\n1: Compress, 0.5 , 1.5 , 10.0 \n"),
        );

        let table = load_measurement_csv(&path).unwrap();
        assert_eq!(table.displacement_um[0], 0.5);
        assert_eq!(table.size_um[0], 10.0);
    }
}
