//! Cycle detection from the phase label column.
//!
//! A rheometer run is a sequence of labeled phases (approach, compress,
//! hold, recover, ...). Every maximal run of compress-labeled rows is one
//! test cycle; rows between compress runs keep the current cycle number for
//! bookkeeping but never reach a regression.

use std::collections::BTreeMap;

/// Fixed suffix identifying the compress (loading + unloading) phase.
///
/// Labels are trimmed of surrounding whitespace before the suffix test.
pub const COMPRESS_SUFFIX: &str = "Compress";

#[inline]
fn is_compress(label: &str, suffix: &str) -> bool {
    label.trim().ends_with(suffix)
}

/// Assign a cycle number to every measurement row.
///
/// A pure scan over the ordered label sequence: the cycle counter starts at
/// 0, becomes 1 at the first compress-labeled row, and increments each time
/// a compress row immediately follows a non-compress row. Back-to-back
/// compress rows belong to the same cycle (one continuous loading +
/// unloading sweep). Non-compress rows carry the current counter unchanged,
/// so rows before the first compress run are tagged 0.
///
/// The produced sequence is non-decreasing and has the same length as
/// `labels`.
///
/// # Example
///
/// ```
/// use rheo_pipeline::processors::segmentation::{assign_cycle_numbers, COMPRESS_SUFFIX};
///
/// let labels: Vec<String> = ["1: Compress", "Hold", "2: Compress"]
///     .iter().map(|s| s.to_string()).collect();
/// assert_eq!(assign_cycle_numbers(&labels, COMPRESS_SUFFIX), vec![1, 1, 2]);
/// ```
pub fn assign_cycle_numbers(labels: &[String], suffix: &str) -> Vec<u32> {
    let mut numbers = Vec::with_capacity(labels.len());
    let mut current_cycle = 0u32;

    for (i, label) in labels.iter().enumerate() {
        if is_compress(label, suffix) {
            if i == 0 {
                current_cycle = 1;
            } else if !is_compress(&labels[i - 1], suffix) {
                current_cycle += 1;
            }
        }
        numbers.push(current_cycle);
    }

    numbers
}

/// Group compress-labeled row indices by cycle number.
///
/// Only compress rows enter the groups; non-compress rows (including any
/// cycle-0 prefix, which owns no compress rows by construction) are left
/// out. The returned map iterates in ascending cycle order, which the
/// summary step relies on.
///
/// # Arguments
///
/// * `labels` - Raw phase labels, one per row
/// * `cycle_numbers` - Output of [`assign_cycle_numbers`] for the same rows
/// * `suffix` - Compress phase suffix
pub fn group_compress_rows(
    labels: &[String],
    cycle_numbers: &[u32],
    suffix: &str,
) -> BTreeMap<u32, Vec<usize>> {
    debug_assert_eq!(
        labels.len(),
        cycle_numbers.len(),
        "labels and cycle numbers must have same length"
    );

    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();

    for (i, label) in labels.iter().enumerate() {
        if is_compress(label, suffix) {
            groups.entry(cycle_numbers[i]).or_default().push(i);
        }
    }

    groups
}
