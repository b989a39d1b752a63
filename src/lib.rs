//! Batch rheometer measurement processing.
//!
//! This crate provides tools for:
//! - Loading Latin-1 encoded rheometer measurement CSV files
//! - Detecting repeated compress (loading + unloading) cycles from the phase label column
//! - Estimating per-cycle storage and shear moduli via least-squares fits on the loading phase
//! - Writing a batch summary CSV covering the first three cycles of each retained file
//!
//! # Example
//!
//! ```no_run
//! use rheo_pipeline::{config::BatchConfig, processors::batch::run_batch};
//!
//! let report = run_batch(&BatchConfig::default()).unwrap();
//! println!("{} files summarized", report.rows.len());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::BatchConfig;
pub use core::loaders::MeasurementTable;
pub use processors::batch::{run_batch, BatchReport};
pub use processors::moduli::CycleModuli;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
