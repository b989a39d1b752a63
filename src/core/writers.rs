//! Summary CSV writer.
//!
//! Writes the batch output table: one row per retained measurement file
//! with the storage and shear moduli of its first three cycles. Column
//! headers follow the instrument's unit conventions (microPascals).

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

/// Column headers of the summary table, in output order.
pub const SUMMARY_HEADERS: [&str; 7] = [
    "File Name",
    "Cycle 1 Storage Modulus (\u{3bc}Pa)",
    "Cycle 1 Shear Modulus (\u{3bc}Pa)",
    "Cycle 2 Storage Modulus (\u{3bc}Pa)",
    "Cycle 2 Shear Modulus (\u{3bc}Pa)",
    "Cycle 3 Storage Modulus (\u{3bc}Pa)",
    "Cycle 3 Shear Modulus (\u{3bc}Pa)",
];

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to flush buffered data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// One output record: a file name and the moduli of its first three cycles.
///
/// `storage[i]` and `shear[i]` hold the moduli of the (i+1)-th valid cycle,
/// in microPascals.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub file_name: String,
    pub storage: [f64; 3],
    pub shear: [f64; 3],
}

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Write the moduli summary table to CSV.
///
/// Creates the file (and any missing parent directories) and writes the
/// fixed header row followed by one record per summary row, preserving the
/// order of `rows`. Values are formatted with six decimal places.
///
/// # Arguments
///
/// * `path` - Output file path
/// * `rows` - Summary rows in file-processing order
///
/// # Errors
///
/// Returns an error if directories or the file cannot be created, or a
/// record fails to write.
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    ensure_parent_dirs(path)?;

    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let buf_writer = BufWriter::new(file);
    let mut csv_writer = csv::Writer::from_writer(buf_writer);

    let path_str = path.display().to_string();

    csv_writer
        .write_record(SUMMARY_HEADERS)
        .map_err(|e| WriteError::CsvError {
            path: path_str.clone(),
            source: e,
        })?;

    for row in rows {
        let record = [
            row.file_name.clone(),
            format!("{:.6}", row.storage[0]),
            format!("{:.6}", row.shear[0]),
            format!("{:.6}", row.storage[1]),
            format!("{:.6}", row.shear[1]),
            format!("{:.6}", row.storage[2]),
            format!("{:.6}", row.shear[2]),
        ];
        csv_writer
            .write_record(&record)
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}
