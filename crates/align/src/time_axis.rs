//! Secondary time-axis alignment.
//!
//! All reaches (or nodes) of a SoS group share one time axis, so only the
//! first row of a label variable is consulted on either side.

use crate::error::AlignError;
use crate::offsets::resolve_offsets;

/// Truncates floating-point time labels to comparable integer keys.
///
/// Fractional parts are dropped toward zero, so `2001.9` and `2001.0` map to
/// the same key.
pub fn time_keys(labels: &[f64]) -> Vec<i64> {
    labels.iter().map(|&t| t as i64).collect()
}

/// Computes the destination column for every source time label.
///
/// `source_labels` is the exchange file's `value_t` row and `store_labels` is
/// the first row of the SoS `{prior}t` variable.  Element `j` of the result is
/// the destination column that receives payload column `j`.
///
/// # Errors
///
/// Same as [`resolve_offsets`], with time keys in place of identifiers.
pub fn align_time_axis(
    source_labels: &[f64],
    store_labels: &[f64],
) -> Result<Vec<usize>, AlignError> {
    resolve_offsets(&time_keys(source_labels), &time_keys(store_labels))
}
