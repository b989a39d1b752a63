//! Core functionality: measurement loading, numeric kernels, and summary writing.

pub mod loaders;
pub mod numeric;
pub mod writers;

pub use loaders::MeasurementTable;
pub use writers::{write_summary_csv, SummaryRow, WriteError};
