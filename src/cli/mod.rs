//! Command-line interface for the moduli pipeline.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::BatchConfig;
use crate::core::loaders;
use crate::processors::{batch, moduli};

#[derive(Parser)]
#[command(name = "rheo-pipeline")]
#[command(about = "Rheometer cycle moduli batch pipeline", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a folder of measurement CSVs into a moduli summary
    Process {
        /// Directory containing measurement CSV files (overrides config)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Output summary CSV path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report per-cycle moduli for a single measurement CSV
    Inspect {
        /// Measurement CSV file
        file: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a titled key/value completion summary
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("{}", title);
    println!("{}", "-".repeat(title.len()));
    for (key, value) in items {
        println!("  {:<16} {}", key, value);
    }
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match BatchConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                BatchConfig::default()
            }
        },
        None => BatchConfig::default(),
    };

    match cli.command {
        Commands::Process { folder, output } => {
            cmd_process(folder, output, config);
        }
        Commands::Inspect { file } => {
            cmd_inspect(&file);
        }
    }
}

fn cmd_process(folder: Option<PathBuf>, output: Option<PathBuf>, mut config: BatchConfig) {
    let start = Instant::now();

    if let Some(folder) = folder {
        config.folder = folder;
    }
    if let Some(output) = output {
        config.output = output;
    }

    println!("Processing measurement files...");
    println!("Input folder: {}", config.folder.display());

    let spinner = create_spinner("Scanning and processing CSV files...");

    match batch::run_batch(&config) {
        Ok(report) => {
            spinner.finish_and_clear();

            for skipped in &report.skipped {
                println!(
                    "Skipped {} ({} valid cycles)",
                    skipped.file_name, skipped.valid_cycles
                );
            }

            if report.rows.is_empty() {
                println!("No files processed.");
            }

            print_summary(
                "Batch Processing Complete",
                &[
                    ("Input folder", config.folder.display().to_string()),
                    ("Files found", report.files_found.to_string()),
                    ("Rows written", report.rows.len().to_string()),
                    ("Files skipped", report.skipped.len().to_string()),
                    ("Read failures", report.read_failures.to_string()),
                    (
                        "Output",
                        report
                            .output_path
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "(none)".to_string()),
                    ),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Batch processing failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_inspect(file: &PathBuf) {
    let table = match loaders::load_measurement_csv(file) {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to load {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };

    let results = moduli::moduli_by_cycle(&table);

    println!("{}: {} rows, {} valid cycles", file.display(), table.len(), results.len());
    for (cycle, m) in &results {
        println!(
            "  Cycle {}: storage {:.6} \u{3bc}Pa, shear {:.6} \u{3bc}Pa",
            cycle, m.storage_modulus, m.shear_modulus
        );
    }
}
