//! Error types for the sos-align crate.

/// Error type for identifier reconciliation.
///
/// Every variant names the offending identifier so a failed merge can be
/// traced back to a single reach, node or time label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlignError {
    /// Returned when a source identifier has no counterpart in the store.
    #[error("identifier {id} not found in destination")]
    Missing {
        /// The unmatched identifier.
        id: i64,
    },

    /// Returned when a matched identifier occurs more than once in the store.
    #[error("identifier {id} occurs {count} times in destination")]
    Duplicate {
        /// The ambiguous identifier.
        id: i64,
        /// Number of occurrences in the destination array.
        count: usize,
    },

    /// Returned when the same identifier appears twice on the source side.
    #[error("identifier {id} occurs more than once in source")]
    DuplicateSource {
        /// The repeated identifier.
        id: i64,
    },
}
