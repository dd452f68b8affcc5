//! Error types for the sos-merge crate.

use std::fmt;

use sos_align::AlignError;
use sos_io::IoError;

/// Which axis of a record failed to align.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignAxis {
    /// Reach or node identifiers.
    Identifier,
    /// Daily time labels.
    Time,
}

impl fmt::Display for AlignAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => f.write_str("identifier"),
            Self::Time => f.write_str("time"),
        }
    }
}

/// Error type for all fallible operations in the sos-merge crate.
///
/// A failed read-back comparison is not an error; it is reported through
/// [`Outcome::NotOverwritten`](crate::Outcome::NotOverwritten).
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Structural problem in the exchange file or SoS.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Identifiers or time labels of a record could not be matched in the SoS.
    #[error("{tag}: '{prior}' ({run_type}) {axis} alignment failed: {cause}")]
    Alignment {
        /// Source tag of the record.
        tag: String,
        /// Prior name of the record.
        prior: String,
        /// Run type of the record.
        run_type: String,
        /// Axis that failed.
        axis: AlignAxis,
        /// Underlying reconciliation failure.
        #[source]
        cause: AlignError,
    },

    /// Payload shape does not fit the destination variable.
    #[error("shape mismatch for '{variable}': {details}")]
    ShapeMismatch {
        /// SoS variable path.
        variable: String,
        /// Description of the mismatch.
        details: String,
    },

    /// A precomputed destination index lies outside the variable.
    #[error("index {index} out of range for '{variable}' with {len} rows")]
    IndexOutOfRange {
        /// SoS variable path.
        variable: String,
        /// Offending index.
        index: usize,
        /// Length of the leading dimension.
        len: usize,
    },

    /// Returned when merge settings are invalid.
    #[error("invalid merge configuration: {reason}")]
    InvalidConfig {
        /// What is wrong.
        reason: String,
    },
}
