//! Low-level NetCDF extraction helpers.

use std::path::Path;

use ndarray::Array2;
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path` read-only, returning
/// [`IoError::FileNotFound`] if the path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Open a NetCDF file at `path` for in-place modification.
pub(crate) fn append_file(path: &Path) -> Result<netcdf::FileMut, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::append(path)?)
}

/// Extract a string from an optional attribute, ignoring non-string values.
pub(crate) fn string_value(attr: Option<netcdf::Attribute<'_>>) -> Option<String> {
    match attr?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Like [`string_value`] but fails with [`IoError::MissingAttribute`].
pub(crate) fn require_string(
    attr: Option<netcdf::Attribute<'_>>,
    name: &str,
    path: &Path,
) -> Result<String, IoError> {
    string_value(attr).ok_or_else(|| IoError::MissingAttribute {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Unwrap an optional variable or fail with [`IoError::MissingVariable`].
pub(crate) fn require_variable<'f>(
    var: Option<netcdf::Variable<'f>>,
    name: &str,
    path: &Path,
) -> Result<netcdf::Variable<'f>, IoError> {
    var.ok_or_else(|| IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Shape of a variable as a list of dimension lengths.
pub(crate) fn shape(var: &netcdf::Variable<'_>) -> Vec<usize> {
    var.dimensions().iter().map(|d| d.len()).collect()
}

/// Read a 1-D or 2-D `f64` variable as an `(n, k)` matrix.
///
/// One-dimensional variables become a single column.
pub(crate) fn read_matrix(var: &netcdf::Variable<'_>, name: &str) -> Result<Array2<f64>, IoError> {
    let dims = shape(var);
    let (rows, cols) = match dims.as_slice() {
        [n] => (*n, 1),
        [n, k] => (*n, *k),
        other => {
            return Err(IoError::DimensionMismatch {
                name: name.to_string(),
                expected: 2,
                got: other.len(),
            });
        }
    };

    let data = var.get_values::<f64, _>(..)?;
    Array2::from_shape_vec((rows, cols), data).map_err(|e| IoError::Validation {
        count: 1,
        details: format!("{name}: {e}"),
    })
}

/// First row of a 1-D or 2-D `f64` variable.
///
/// For a 1-D variable the whole array is the row.
pub(crate) fn read_first_row(var: &netcdf::Variable<'_>, name: &str) -> Result<Vec<f64>, IoError> {
    let matrix = read_matrix(var, name)?;
    if matrix.ncols() == 1 && shape(var).len() == 1 {
        return Ok(matrix.column(0).to_vec());
    }
    Ok(matrix
        .rows()
        .into_iter()
        .next()
        .map(|row| row.to_vec())
        .unwrap_or_default())
}
