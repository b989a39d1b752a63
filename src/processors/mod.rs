//! Processing stages: cycle segmentation, moduli estimation, batch driving.

pub mod batch;
pub mod moduli;
pub mod segmentation;

pub use batch::{run_batch, BatchReport, SkippedFile, REQUIRED_CYCLES};
pub use moduli::{estimate_cycle_moduli, moduli_by_cycle, CycleModuli, EstimateError};
pub use segmentation::{assign_cycle_numbers, group_compress_rows, COMPRESS_SUFFIX};
