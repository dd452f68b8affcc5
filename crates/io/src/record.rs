//! Prior record container.

use ndarray::Array2;
use sos_schema::IdKind;

use crate::error::IoError;
use crate::validate;

/// Identity of a record: which prior, from which source, for which SoS run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    source: String,
    prior: String,
    run_type: String,
}

impl RecordKey {
    /// Creates a key from its parts.
    pub fn new(
        source: impl Into<String>,
        prior: impl Into<String>,
        run_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            prior: prior.into(),
            run_type: run_type.into(),
        }
    }

    /// Splits an exchange-file group name `"{source}_{prior}"` at its first
    /// underscore.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the name has no underscore or either
    /// side is empty.
    pub fn from_group_name(name: &str, run_type: impl Into<String>) -> Result<Self, IoError> {
        match name.split_once('_') {
            Some((source, prior)) if !source.is_empty() && !prior.is_empty() => {
                Ok(Self::new(source, prior, run_type))
            }
            _ => Err(IoError::Validation {
                count: 1,
                details: format!("group name '{name}' is not of the form source_prior"),
            }),
        }
    }

    /// Source tag (e.g. `grdc`, `gbnode`).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the prior being overwritten.
    pub fn prior(&self) -> &str {
        &self.prior
    }

    /// SoS run type the record targets.
    pub fn run_type(&self) -> &str {
        &self.run_type
    }

    /// Exchange-file group name for this key.
    pub fn group_name(&self) -> String {
        format!("{}_{}", self.source, self.prior)
    }
}

/// One prior to merge: values plus the identifiers and offsets that place
/// them in the SoS.
///
/// `values` always has shape `(n, k)`: scalar priors use `k = 1`, monthly,
/// probability and daily priors use their second-axis length.
#[derive(Debug, Clone)]
pub struct PriorRecord {
    key: RecordKey,
    id_kind: IdKind,
    ids: Vec<i64>,
    indexes: Vec<usize>,
    values: Array2<f64>,
    time_labels: Option<Vec<f64>>,
}

impl PriorRecord {
    /// Creates a record after validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `indexes` or the rows of `values`
    /// do not match the identifier count, or any index is negative.
    pub fn new(
        key: RecordKey,
        id_kind: IdKind,
        ids: Vec<i64>,
        indexes: Vec<i64>,
        values: Array2<f64>,
    ) -> Result<Self, IoError> {
        let mut c = validate::validate_lengths(ids.len(), indexes.len(), values.nrows());
        c.extend(validate::validate_indexes_non_negative(&indexes));
        c.finish()?;

        let indexes = indexes.into_iter().map(|i| i as usize).collect();
        Ok(Self {
            key,
            id_kind,
            ids,
            indexes,
            values,
            time_labels: None,
        })
    }

    /// Attaches the time label of every payload column.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if the label count differs from
    /// the number of payload columns.
    pub fn with_time_labels(mut self, labels: Vec<f64>) -> Result<Self, IoError> {
        if labels.len() != self.values.ncols() {
            return Err(IoError::DimensionMismatch {
                name: format!("{} value_t", self.key.group_name()),
                expected: self.values.ncols(),
                got: labels.len(),
            });
        }
        self.time_labels = Some(labels);
        Ok(self)
    }

    /// Record identity.
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// Whether identifiers are reach or node ids.
    pub fn id_kind(&self) -> IdKind {
        self.id_kind
    }

    /// Reach or node identifiers, one per payload row.
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Precomputed destination offsets, one per payload row.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Payload of shape `(n, k)`.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Time label per payload column, present for daily priors.
    pub fn time_labels(&self) -> Option<&[f64]> {
        self.time_labels.as_deref()
    }

    /// Number of payload rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the record carries no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
