//! Priors JSON input for the exchange-file builder.
//!
//! The document is a nested mapping
//! `{source: {prior_name: PriorEntry}}`, e.g.
//!
//! ```json
//! {
//!   "grdc": {
//!     "grdc_q": {
//!       "run_type": "constrained",
//!       "reach_ids": [74230000011, 74230000021],
//!       "indexes": [17, 4],
//!       "values": [[1.5, 1.7], [0.2, 0.3]],
//!       "data_type": "f8",
//!       "value_t": [[731000, 731001], [731000, 731001]]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use sos_schema::{IdKind, PriorCategory};

use crate::error::IoError;
use crate::validate::{self, ValidationCollector};

/// Parsed priors document: source tag → prior name → entry.
pub type PriorsInput = BTreeMap<String, BTreeMap<String, PriorEntry>>;

/// Storage type of `prior_values` in the exchange file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum DataType {
    /// 64-bit float.
    #[default]
    #[serde(rename = "f8", alias = "float64")]
    F8,
    /// 32-bit float.
    #[serde(rename = "f4", alias = "float32")]
    F4,
    /// 64-bit signed integer.
    #[serde(rename = "i8", alias = "int64")]
    I8,
    /// 32-bit signed integer.
    #[serde(rename = "i4", alias = "int32")]
    I4,
}

/// Payload of one prior: a flat list for scalar priors or one row per
/// identifier for priors with a second axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriorValues {
    /// One value per identifier.
    Scalar(Vec<f64>),
    /// One row per identifier.
    Matrix(Vec<Vec<f64>>),
}

impl PriorValues {
    /// Number of identifier rows.
    pub fn n_rows(&self) -> usize {
        match self {
            Self::Scalar(v) => v.len(),
            Self::Matrix(rows) => rows.len(),
        }
    }

    /// Column count, `None` for scalar payloads.
    pub fn n_cols(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Matrix(rows) => Some(rows.first().map_or(0, Vec::len)),
        }
    }

    /// Row-major values and the column count (`None` for scalar payloads).
    pub fn flatten(&self) -> (Vec<f64>, Option<usize>) {
        match self {
            Self::Scalar(v) => (v.clone(), None),
            Self::Matrix(rows) => (rows.iter().flatten().copied().collect(), self.n_cols()),
        }
    }
}

/// Everything needed to pack one (source, prior) group.
#[derive(Debug, Clone, Deserialize)]
pub struct PriorEntry {
    /// SoS run type the prior targets.
    pub run_type: String,
    /// Reach identifiers, for reach-level priors.
    #[serde(default)]
    pub reach_ids: Option<Vec<i64>>,
    /// Node identifiers, for node-level priors.
    #[serde(default)]
    pub node_ids: Option<Vec<i64>>,
    /// Destination offsets in the SoS leading dimension.
    pub indexes: Vec<i64>,
    /// Prior values.
    pub values: PriorValues,
    /// Storage type for `prior_values`.
    #[serde(default)]
    pub data_type: DataType,
    /// Time labels for daily priors, same shape as `values`.
    #[serde(default)]
    pub value_t: Option<Vec<Vec<f64>>>,
}

impl PriorEntry {
    /// Identifier kind and identifiers, whichever list is present.
    pub fn ids(&self) -> Option<(IdKind, &[i64])> {
        match (&self.reach_ids, &self.node_ids) {
            (Some(ids), _) => Some((IdKind::Reach, ids)),
            (None, Some(ids)) => Some((IdKind::Node, ids)),
            (None, None) => None,
        }
    }

    /// Check that the entry can be packed under `category`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every problem found: missing
    /// or doubled identifier lists, identifier kind not matching the
    /// category, length mismatches, ragged or wrongly sized rows, indexes
    /// outside the `i4` range, or missing time labels for daily priors.
    pub fn validate(&self, label: &str, category: PriorCategory) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();

        if self.reach_ids.is_some() && self.node_ids.is_some() {
            c.push(format!("{label}: both reach_ids and node_ids given"));
        }
        let Some((kind, ids)) = self.ids() else {
            c.push(format!("{label}: neither reach_ids nor node_ids given"));
            return c.finish();
        };
        if ids.is_empty() {
            c.push(format!("{label}: no identifiers"));
        }
        if kind != category.id_kind() {
            c.push(format!(
                "{label}: {category:?} prior needs {} but got {}",
                category.id_kind().variable(),
                kind.variable()
            ));
        }

        c.extend(validate::validate_lengths(
            ids.len(),
            self.indexes.len(),
            self.values.n_rows(),
        ));
        c.extend(validate::validate_indexes_non_negative(&self.indexes));
        if let Some(&idx) = self.indexes.iter().find(|&&i| i > i64::from(i32::MAX)) {
            c.push(format!("{label}: index {idx} does not fit in i4"));
        }

        match (&self.values, category.secondary_axis()) {
            (PriorValues::Scalar(_), None) => {}
            (PriorValues::Matrix(rows), Some(axis)) => {
                c.extend(validate::validate_rectangular("values", rows));
                if let (Some(len), Some(first)) = (axis.fixed_len(), rows.first())
                    && first.len() != len
                {
                    c.push(format!(
                        "{label}: {} needs {len} columns, got {}",
                        axis.dimension(),
                        first.len()
                    ));
                }
            }
            (PriorValues::Scalar(_), Some(axis)) => {
                c.push(format!("{label}: values need a {} axis", axis.dimension()));
            }
            (PriorValues::Matrix(_), None) => {
                c.push(format!("{label}: scalar prior given nested values"));
            }
        }

        if category.has_time_labels() {
            match &self.value_t {
                None => c.push(format!("{label}: daily prior without value_t")),
                Some(rows) => {
                    c.extend(validate::validate_rectangular("value_t", rows));
                    let value_shape = (self.values.n_rows(), self.values.n_cols());
                    let time_shape = (rows.len(), rows.first().map(Vec::len));
                    if value_shape != time_shape {
                        c.push(format!(
                            "{label}: value_t shape {time_shape:?} != values shape {value_shape:?}"
                        ));
                    }
                }
            }
        }

        c.finish()
    }
}

/// Load a priors JSON document from disk.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file is missing, or
/// [`IoError::Json`] if it cannot be read or parsed.
pub fn load_priors(path: &Path) -> Result<PriorsInput, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
