//! In-place access to a canonical SoS file.
//!
//! Variables are addressed by their full group path, e.g.
//! `"model/grdc/grdc_q"`. The engine never creates structure here; every
//! variable it touches must already exist.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::IoError;
use crate::netcdf_read;

/// A SoS file opened for appending.
///
/// The file is closed when the value is dropped or [`close`](Self::close)d.
pub struct SosFile {
    path: PathBuf,
    file: netcdf::FileMut,
}

impl std::fmt::Debug for SosFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SosFile").field("path", &self.path).finish()
    }
}

impl SosFile {
    /// Open an existing SoS file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if the file does not exist, or
    /// [`IoError::Netcdf`] if it cannot be opened for writing.
    pub fn open(path: &Path) -> Result<Self, IoError> {
        let file = netcdf_read::append_file(path)?;
        debug!(path = %path.display(), "opened SoS for append");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the open file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names the missing group when the variable's group path is absent,
    /// otherwise the variable itself.
    fn missing(&self, var_path: &str) -> IoError {
        if let Some((group, _)) = var_path.rsplit_once('/')
            && matches!(self.file.group(group), Ok(None))
        {
            return IoError::MissingGroup {
                name: group.to_string(),
                path: self.path.clone(),
            };
        }
        IoError::MissingVariable {
            name: var_path.to_string(),
            path: self.path.clone(),
        }
    }

    fn variable(&self, var_path: &str) -> Result<netcdf::Variable<'_>, IoError> {
        self.file
            .variable(var_path)
            .ok_or_else(|| self.missing(var_path))
    }

    fn variable_mut(&mut self, var_path: &str) -> Result<netcdf::VariableMut<'_>, IoError> {
        if self.file.variable(var_path).is_none() {
            return Err(self.missing(var_path));
        }
        let path = self.path.clone();
        self.file
            .variable_mut(var_path)
            .ok_or(IoError::MissingVariable {
                name: var_path.to_string(),
                path,
            })
    }

    /// Dimension lengths of a variable.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingGroup`] if the variable's group does not
    /// exist, or [`IoError::MissingVariable`] if only the variable is absent.
    pub fn shape(&self, var_path: &str) -> Result<Vec<usize>, IoError> {
        Ok(netcdf_read::shape(&self.variable(var_path)?))
    }

    /// Read a whole identifier variable.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingVariable`] or [`IoError::Netcdf`].
    pub fn read_ids(&self, var_path: &str) -> Result<Vec<i64>, IoError> {
        Ok(self.variable(var_path)?.get_values::<i64, _>(..)?)
    }

    /// First row of a time-label variable.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingVariable`], [`IoError::DimensionMismatch`]
    /// for variables of rank above two, or [`IoError::Netcdf`].
    pub fn read_first_row(&self, var_path: &str) -> Result<Vec<f64>, IoError> {
        netcdf_read::read_first_row(&self.variable(var_path)?, var_path)
    }

    /// Write one cell of a 1-D or 2-D variable.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if `index` is not 1-D or 2-D,
    /// or [`IoError::Netcdf`] if the index is out of range.
    pub fn put_cell(&mut self, var_path: &str, index: &[usize], value: f64) -> Result<(), IoError> {
        let mut var = self.variable_mut(var_path)?;
        match *index {
            [i] => var.put_value(value, [i])?,
            [i, j] => var.put_value(value, [i, j])?,
            _ => {
                return Err(IoError::DimensionMismatch {
                    name: var_path.to_string(),
                    expected: 2,
                    got: index.len(),
                });
            }
        }
        Ok(())
    }

    /// Read one cell of a 1-D or 2-D variable.
    ///
    /// # Errors
    ///
    /// Same as [`put_cell`](Self::put_cell).
    pub fn get_cell(&self, var_path: &str, index: &[usize]) -> Result<f64, IoError> {
        let var = self.variable(var_path)?;
        let value = match *index {
            [i] => var.get_value::<f64, _>([i])?,
            [i, j] => var.get_value::<f64, _>([i, j])?,
            _ => {
                return Err(IoError::DimensionMismatch {
                    name: var_path.to_string(),
                    expected: 2,
                    got: index.len(),
                });
            }
        };
        Ok(value)
    }

    /// Flush and close the file.
    pub fn close(self) {
        debug!(path = %self.path.display(), "closing SoS");
        drop(self.file);
    }
}
