//! Storage and shear moduli estimation.
//!
//! For each detected compress cycle, the loading sub-phase (rows where
//! displacement is increasing) is isolated via the displacement gradient,
//! and a least-squares line of stress against strain yields the storage
//! modulus (slope). The shear modulus is slope / 3 under the isotropic
//! elastic approximation.

use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::core::loaders::MeasurementTable;
use crate::core::numeric::{self, FitError};
use super::segmentation::{assign_cycle_numbers, group_compress_rows, COMPRESS_SUFFIX};

/// Errors that make a single cycle yield no result.
///
/// All of these are local to one cycle; the caller skips the cycle and
/// continues with the rest of the file.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// Fewer than 2 rows survive the positive-gradient loading filter.
    #[error("only {found} loading-phase rows (need at least 2)")]
    InsufficientLoadingRows { found: usize },

    /// The cycle's first row reports a zero sample size, so strain is
    /// undefined. Skipping the cycle avoids propagating NaN/inf silently.
    #[error("initial sample size is zero, strain is undefined")]
    ZeroInitialLength,

    /// The regression itself failed (e.g. identical strain at every
    /// selected row).
    #[error("stress-strain fit failed: {0}")]
    Fit(#[from] FitError),
}

/// Moduli computed for one cycle, in microPascals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleModuli {
    /// Slope of the stress-strain fit over the loading sub-phase.
    pub storage_modulus: f64,
    /// Storage modulus divided by 3.
    pub shear_modulus: f64,
}

/// Estimate moduli for one cycle's compress rows.
///
/// Inputs are the cycle's displacement, force, and size columns, restricted
/// to compress-labeled rows in original acquisition order. The first row is
/// the baseline: strain is displacement change over the initial sample
/// size, stress is the force signal taken directly.
///
/// The loading sub-phase is the set of rows with a strictly positive
/// displacement gradient; zero-gradient points (e.g. the apex of a
/// symmetric sweep) are excluded.
///
/// # Errors
///
/// Returns an error if fewer than 2 loading rows remain, the initial size
/// is zero, or the fit is degenerate.
pub fn estimate_cycle_moduli(
    displacement_um: &[f64],
    force_un: &[f64],
    size_um: &[f64],
) -> Result<CycleModuli, EstimateError> {
    debug_assert_eq!(displacement_um.len(), force_un.len());
    debug_assert_eq!(displacement_um.len(), size_um.len());

    if displacement_um.is_empty() {
        return Err(EstimateError::InsufficientLoadingRows { found: 0 });
    }

    let initial_displacement = displacement_um[0];
    let initial_length = size_um[0];
    if initial_length == 0.0 {
        return Err(EstimateError::ZeroInitialLength);
    }

    let grad = numeric::gradient(displacement_um);

    let mut strain = Vec::with_capacity(displacement_um.len());
    let mut stress = Vec::with_capacity(displacement_um.len());
    for i in 0..displacement_um.len() {
        if grad[i] > 0.0 {
            strain.push((displacement_um[i] - initial_displacement) / initial_length);
            stress.push(force_un[i]);
        }
    }

    if strain.len() < 2 {
        return Err(EstimateError::InsufficientLoadingRows {
            found: strain.len(),
        });
    }

    let fit = numeric::fit_line(&strain, &stress)?;

    Ok(CycleModuli {
        storage_modulus: fit.slope,
        shear_modulus: fit.slope / 3.0,
    })
}

/// Compute moduli for every detected cycle of a measurement file.
///
/// Segments the file into cycles, then runs the estimator on each cycle's
/// compress rows. Cycles that fail to yield a result are logged at debug
/// level and omitted; the map iterates in ascending cycle order.
pub fn moduli_by_cycle(table: &MeasurementTable) -> BTreeMap<u32, CycleModuli> {
    let cycle_numbers = assign_cycle_numbers(&table.labels, COMPRESS_SUFFIX);
    let groups = group_compress_rows(&table.labels, &cycle_numbers, COMPRESS_SUFFIX);

    let mut results = BTreeMap::new();

    for (cycle, rows) in groups {
        let displacement: Vec<f64> = rows.iter().map(|&i| table.displacement_um[i]).collect();
        let force: Vec<f64> = rows.iter().map(|&i| table.force_un[i]).collect();
        let size: Vec<f64> = rows.iter().map(|&i| table.size_um[i]).collect();

        match estimate_cycle_moduli(&displacement, &force, &size) {
            Ok(moduli) => {
                results.insert(cycle, moduli);
            }
            Err(e) => {
                debug!("cycle {} yields no result: {}", cycle, e);
            }
        }
    }

    results
}
