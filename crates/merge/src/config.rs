//! Configuration for merge runs.

use std::path::{Path, PathBuf};

use crate::error::MergeError;
use crate::verify::Tolerance;

/// Where the canonical stores live and how strictly writes are verified.
///
/// # Example
///
/// ```
/// use sos_merge::{MergeConfig, Tolerance};
///
/// let config = MergeConfig::new("/mnt/sos").with_tolerance(Tolerance::new(1e-6, 0.0));
/// assert_eq!(
///     config.sos_path("constrained", "na_sword_v16_SOS_priors.nc"),
///     std::path::Path::new("/mnt/sos/constrained/na_sword_v16_SOS_priors.nc")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Root directory holding one sub-directory per run type.
    sos_dir: PathBuf,
    /// Read-back comparison tolerance.
    tolerance: Tolerance,
}

impl MergeConfig {
    /// Creates a configuration rooted at `sos_dir` with default tolerance.
    pub fn new(sos_dir: impl Into<PathBuf>) -> Self {
        Self {
            sos_dir: sos_dir.into(),
            tolerance: Tolerance::default(),
        }
    }

    /// Sets the read-back tolerance.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the SoS root directory.
    pub fn sos_dir(&self) -> &Path {
        &self.sos_dir
    }

    /// Returns the read-back tolerance.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Location of the SoS file for `run_type`.
    pub fn sos_path(&self, run_type: &str, sos_file: &str) -> PathBuf {
        self.sos_dir.join(run_type).join(sos_file)
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::InvalidConfig`] if the SoS directory does not
    /// exist or the tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<(), MergeError> {
        if !self.sos_dir.is_dir() {
            return Err(MergeError::InvalidConfig {
                reason: format!("SoS directory {} does not exist", self.sos_dir.display()),
            });
        }
        if !self.tolerance.is_valid() {
            return Err(MergeError::InvalidConfig {
                reason: format!(
                    "tolerance must be finite and non-negative, got rtol={} atol={}",
                    self.tolerance.rtol(),
                    self.tolerance.atol()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = MergeConfig::new("/sos");
        assert_eq!(cfg.sos_dir(), Path::new("/sos"));
        assert_eq!(cfg.tolerance(), Tolerance::default());
    }

    #[test]
    fn sos_path_joins_run_type() {
        let cfg = MergeConfig::new("/sos");
        assert_eq!(
            cfg.sos_path("unconstrained", "sa_sword_v16_SOS_priors.nc"),
            PathBuf::from("/sos/unconstrained/sa_sword_v16_SOS_priors.nc")
        );
    }

    #[test]
    fn validate_missing_dir() {
        let err = MergeConfig::new("/definitely/not/here").validate().unwrap_err();
        assert!(matches!(err, MergeError::InvalidConfig { .. }));
    }

    #[test]
    fn validate_bad_tolerance() {
        let dir = std::env::temp_dir();
        let err = MergeConfig::new(dir)
            .with_tolerance(Tolerance::new(-1.0, 0.0))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("rtol=-1"));
    }
}
