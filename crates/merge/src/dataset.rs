//! Store abstraction the merge engine writes through.

use sos_io::SosFile;

use crate::error::MergeError;

/// The operations the merge engine needs from a canonical store.
///
/// Variables are addressed by full group path (`"model/grdc/grdc_q"`) and
/// cells by a 1-D or 2-D index.
pub trait SosDataset {
    /// Dimension lengths of a variable.
    fn shape(&self, var_path: &str) -> Result<Vec<usize>, MergeError>;

    /// Whole identifier variable.
    fn read_ids(&self, var_path: &str) -> Result<Vec<i64>, MergeError>;

    /// First row of a time-label variable.
    fn read_time_row(&self, var_path: &str) -> Result<Vec<f64>, MergeError>;

    /// Write one cell.
    fn write_cell(&mut self, var_path: &str, index: &[usize], value: f64)
    -> Result<(), MergeError>;

    /// Read one cell.
    fn read_cell(&self, var_path: &str, index: &[usize]) -> Result<f64, MergeError>;
}

impl SosDataset for SosFile {
    fn shape(&self, var_path: &str) -> Result<Vec<usize>, MergeError> {
        Ok(SosFile::shape(self, var_path)?)
    }

    fn read_ids(&self, var_path: &str) -> Result<Vec<i64>, MergeError> {
        Ok(SosFile::read_ids(self, var_path)?)
    }

    fn read_time_row(&self, var_path: &str) -> Result<Vec<f64>, MergeError> {
        Ok(self.read_first_row(var_path)?)
    }

    fn write_cell(
        &mut self,
        var_path: &str,
        index: &[usize],
        value: f64,
    ) -> Result<(), MergeError> {
        Ok(self.put_cell(var_path, index, value)?)
    }

    fn read_cell(&self, var_path: &str, index: &[usize]) -> Result<f64, MergeError> {
        Ok(self.get_cell(var_path, index)?)
    }
}
