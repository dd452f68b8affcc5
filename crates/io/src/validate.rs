//! Shape checks for prior records.
//!
//! Every check returns a [`ValidationCollector`] so callers can merge the
//! problems of one record into a single [`IoError::Validation`].

use crate::error::IoError;

/// Gathers problem messages before turning them into one error.
pub(crate) struct ValidationCollector {
    messages: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    /// Takes over the messages of another collector.
    pub(crate) fn extend(&mut self, other: ValidationCollector) {
        self.messages.extend(other.messages);
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    /// `Ok(())` when nothing was pushed, otherwise an [`IoError::Validation`]
    /// whose details are the messages separated by `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        match self.messages.len() {
            0 => Ok(()),
            count => Err(IoError::Validation {
                count,
                details: self.messages.join("; "),
            }),
        }
    }
}

/// Check that the index and value rows match the identifier count.
pub(crate) fn validate_lengths(
    n_ids: usize,
    n_indexes: usize,
    n_value_rows: usize,
) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    if n_indexes != n_ids {
        c.push(format!("indexes length {n_indexes} != identifier length {n_ids}"));
    }
    if n_value_rows != n_ids {
        c.push(format!(
            "values length {n_value_rows} != identifier length {n_ids}"
        ));
    }

    c
}

/// Check that every destination index is non-negative.
///
/// Records one message per offending position.
pub(crate) fn validate_indexes_non_negative(indexes: &[i64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, &idx) in indexes.iter().enumerate() {
        if idx < 0 {
            c.push(format!("negative destination index at position {i}: {idx}"));
        }
    }

    c
}

/// Check that every row of a nested array has the same length.
pub(crate) fn validate_rectangular(name: &str, rows: &[Vec<f64>]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    if let Some(first) = rows.first() {
        let width = first.len();
        for (i, row) in rows.iter().enumerate().skip(1) {
            if row.len() != width {
                c.push(format!(
                    "{name} row {i} has {} columns, expected {width}",
                    row.len()
                ));
            }
        }
    }

    c
}
