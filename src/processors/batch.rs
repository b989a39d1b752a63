//! Batch driver: folder scanning, per-file processing, summary output.
//!
//! Files are processed strictly one at a time in lexicographic order; no
//! state is shared between files. Every per-file and per-cycle failure is
//! local: a read error or an insufficient-cycles file is logged and
//! skipped, and the batch continues.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use crate::config::BatchConfig;
use crate::core::loaders;
use crate::core::writers::{write_summary_csv, SummaryRow};
use super::moduli::{moduli_by_cycle, CycleModuli};

/// Number of valid cycle results a file must yield to be retained.
pub const REQUIRED_CYCLES: usize = 3;

/// A file excluded from the summary for lack of valid cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_name: String,
    pub valid_cycles: usize,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// CSV files found in the input folder.
    pub files_found: usize,
    /// Summary rows, in file-processing order (also written to disk).
    pub rows: Vec<SummaryRow>,
    /// Files excluded for having fewer than [`REQUIRED_CYCLES`] valid cycles.
    pub skipped: Vec<SkippedFile>,
    /// Files that could not be read or parsed.
    pub read_failures: usize,
    /// Where the summary was written, if any row survived.
    pub output_path: Option<PathBuf>,
}

/// List the CSV files of a folder in lexicographic order.
///
/// # Errors
///
/// Returns an error if the folder cannot be read.
pub fn list_csv_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(folder)
        .with_context(|| format!("Failed to read input folder: {}", folder.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Build a summary row from a file's per-cycle results.
///
/// Returns `None` if fewer than [`REQUIRED_CYCLES`] cycles yielded a
/// result; otherwise uses the three lowest cycle numbers in ascending
/// order. Files are retained whole or not at all, never blank-filled.
pub fn summarize_file(file_name: &str, results: &BTreeMap<u32, CycleModuli>) -> Option<SummaryRow> {
    if results.len() < REQUIRED_CYCLES {
        return None;
    }

    let mut storage = [0.0; REQUIRED_CYCLES];
    let mut shear = [0.0; REQUIRED_CYCLES];
    for (slot, moduli) in results.values().take(REQUIRED_CYCLES).enumerate() {
        storage[slot] = moduli.storage_modulus;
        shear[slot] = moduli.shear_modulus;
    }

    Some(SummaryRow {
        file_name: file_name.to_string(),
        storage,
        shear,
    })
}

/// Run the full batch: scan, process each file, write the summary.
///
/// The summary is only written if at least one file was retained; a run
/// where every file was skipped produces no output file and a report with
/// no rows.
///
/// # Errors
///
/// Returns an error if the input folder cannot be read or the summary file
/// cannot be written. Per-file failures never abort the batch.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let files = list_csv_files(&config.folder)?;

    let mut report = BatchReport {
        files_found: files.len(),
        ..BatchReport::default()
    };

    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let table = match loaders::load_measurement_csv(path) {
            Ok(table) => table,
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                report.read_failures += 1;
                continue;
            }
        };

        let results = moduli_by_cycle(&table);

        match summarize_file(&file_name, &results) {
            Some(row) => report.rows.push(row),
            None => {
                warn!(
                    "Skipping file {} due to insufficient cycles (found {}).",
                    file_name,
                    results.len()
                );
                report.skipped.push(SkippedFile {
                    file_name,
                    valid_cycles: results.len(),
                });
            }
        }
    }

    if !report.rows.is_empty() {
        write_summary_csv(&config.output, &report.rows)
            .with_context(|| format!("Failed to write summary: {}", config.output.display()))?;
        report.output_path = Some(config.output.clone());
    }

    Ok(report)
}
