//! Identifier-to-offset permutation.

use std::collections::HashSet;

use tracing::debug;

use crate::error::AlignError;

/// Returns the permutation that stably sorts `values` in ascending order.
///
/// `values[sorter[0]] <= values[sorter[1]] <= ...`; equal values keep their
/// original relative order.
pub fn argsort(values: &[i64]) -> Vec<usize> {
    let mut sorter: Vec<usize> = (0..values.len()).collect();
    sorter.sort_by_key(|&i| values[i]);
    sorter
}

/// Finds, for every `source_ids[i]`, its position in the unsorted `store_ids`.
///
/// `store_ids` is argsorted once, each source identifier is located by binary
/// search in the sorted view, and the hit is mapped back through the sorter.
/// Runs in `O((n + m) log m)`.
///
/// Only identifiers that are actually matched must be unique in `store_ids`;
/// repeated fill values elsewhere in the destination are tolerated.
///
/// # Errors
///
/// - [`AlignError::DuplicateSource`] if a source identifier is repeated.
/// - [`AlignError::Missing`] if a source identifier is absent from the store.
/// - [`AlignError::Duplicate`] if a matched identifier is not unique in the store.
pub fn resolve_offsets(source_ids: &[i64], store_ids: &[i64]) -> Result<Vec<usize>, AlignError> {
    let mut seen = HashSet::with_capacity(source_ids.len());
    for &id in source_ids {
        if !seen.insert(id) {
            return Err(AlignError::DuplicateSource { id });
        }
    }

    let sorter = argsort(store_ids);
    let sorted: Vec<i64> = sorter.iter().map(|&i| store_ids[i]).collect();

    let offsets = source_ids
        .iter()
        .map(|&id| {
            let lo = sorted.partition_point(|&v| v < id);
            if sorted.get(lo) != Some(&id) {
                return Err(AlignError::Missing { id });
            }
            let count = sorted[lo..].partition_point(|&v| v == id);
            if count > 1 {
                return Err(AlignError::Duplicate { id, count });
            }
            Ok(sorter[lo])
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        n_source = source_ids.len(),
        n_store = store_ids.len(),
        "resolved identifier offsets"
    );
    Ok(offsets)
}
