//! Error types for sos-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the sos-io crate.
///
/// Covers missing files, failures from the NetCDF library, malformed priors
/// JSON, structural gaps in an exchange file or SoS (missing groups,
/// variables, attributes) and validation of record shapes.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Input file (priors JSON, exchange file or SoS) is absent.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// Failure reported by libnetcdf.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Message from the library.
        reason: String,
    },

    /// Returned when the priors JSON cannot be read or parsed.
    #[error("priors json error in {}: {reason}", path.display())]
    Json {
        /// Path of the JSON file.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a group is not present in a file.
    #[error("group '{name}' not found in {}", path.display())]
    MissingGroup {
        /// Name or path of the missing group.
        name: String,
        /// File that was searched.
        path: PathBuf,
    },

    /// A variable the merge or exchange layout depends on is absent.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name or path of the missing variable.
        name: String,
        /// File that was searched.
        path: PathBuf,
    },

    /// Returned when a required string attribute is absent or not a string.
    #[error("attribute '{name}' missing or not a string in {}", path.display())]
    MissingAttribute {
        /// Name of the attribute.
        name: String,
        /// File that was searched.
        path: PathBuf,
    },

    /// A prior entry or record failed its shape checks.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// How many checks failed.
        count: usize,
        /// Failed checks, `"; "`-separated.
        details: String,
    },

    /// Returned when a variable has an unexpected number or size of dimensions.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the variable or dimension.
        name: String,
        /// Size required.
        expected: usize,
        /// Size found.
        got: usize,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}
