//! Read-back comparison.

use ndarray::Array2;

/// Absolute/relative tolerance for comparing written and read-back values.
///
/// Two values match when `|written - read| <= atol + rtol * |read|`; equal
/// infinities match and NaN never does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    rtol: f64,
    atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    /// Creates a tolerance from relative and absolute parts.
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Relative tolerance.
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Absolute tolerance.
    pub fn atol(&self) -> f64 {
        self.atol
    }

    /// Whether both parts are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.rtol.is_finite() && self.atol.is_finite() && self.rtol >= 0.0 && self.atol >= 0.0
    }

    /// Compares a single pair.
    pub fn is_close(&self, written: f64, read: f64) -> bool {
        if written == read {
            return true;
        }
        (written - read).abs() <= self.atol + self.rtol * read.abs()
    }

    /// Compares two equally shaped matrices element by element.
    ///
    /// Arrays of different shape never match.
    pub fn all_close(&self, written: &Array2<f64>, read: &Array2<f64>) -> bool {
        written.dim() == read.dim()
            && written
                .iter()
                .zip(read.iter())
                .all(|(&w, &r)| self.is_close(w, r))
    }
}
