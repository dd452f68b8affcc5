//! Exchange-file builder configuration and writer.

use std::path::{Path, PathBuf};

use sos_schema::{PriorCategory, SecondaryAxis};
use tracing::{debug, info};

use crate::error::IoError;
use crate::priors::{DataType, PriorEntry, PriorsInput};

/// Length of the `nchars` dimension in USGS groups.
const USGS_NCHARS: usize = 16;

/// Format of the `production_date` global attribute.
const PRODUCTION_DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Configuration for writing an exchange file.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Author of the priors.
    author: String,
    /// Contact address of the author.
    contact: String,
    /// Name of the target SoS file (no directory).
    sos_file: String,
    /// Directory the exchange file is written to.
    output_dir: PathBuf,
}

impl PackConfig {
    /// Creates a configuration writing into `output_dir`.
    pub fn new(
        author: impl Into<String>,
        contact: impl Into<String>,
        sos_file: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            author: author.into(),
            contact: contact.into(),
            sos_file: sos_file.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Returns the author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the target SoS file name.
    pub fn sos_file(&self) -> &str {
        &self.sos_file
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name of the exchange file: the author with spaces replaced by
    /// underscores and lower-cased, then the continent prefix of the SoS file.
    ///
    /// `"Jane Doe"` + `"na_sword_v16_SOS_priors.nc"` → `"jane_doe_na.nc"`.
    pub fn file_name(&self) -> String {
        let author = self.author.replace(' ', "_").to_lowercase();
        let prefix = self.sos_file.split('_').next().unwrap_or_default();
        format!("{author}_{prefix}.nc")
    }

    /// Full path of the exchange file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.file_name())
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the author or SoS file name is
    /// empty, or [`IoError::FileNotFound`] if the output directory is missing.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.author.trim().is_empty() {
            problems.push("author must not be empty");
        }
        if self.sos_file.trim().is_empty() {
            problems.push("sos_file must not be empty");
        }
        if !problems.is_empty() {
            return Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }
        if !self.output_dir.is_dir() {
            return Err(IoError::FileNotFound {
                path: self.output_dir.clone(),
            });
        }
        Ok(())
    }
}

/// Secondary dimensions every group from `source` receives, regardless of
/// the prior being packed.
fn source_axes(source: &str) -> &'static [SecondaryAxis] {
    match source {
        "wbm" | "grades" => &[SecondaryAxis::Months, SecondaryAxis::Probability],
        "grdc" | "usgs" => &[
            SecondaryAxis::Months,
            SecondaryAxis::Probability,
            SecondaryAxis::Days,
        ],
        _ => &[],
    }
}

/// Write `priors` to a new exchange file and return its path.
///
/// Every entry is validated before the file is created, so a bad entry never
/// leaves a half-written file behind. Sources with no priors are skipped.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for invalid configuration or entries and
/// [`IoError::Netcdf`] if the file cannot be written.
pub fn write_exchange(priors: &PriorsInput, config: &PackConfig) -> Result<PathBuf, IoError> {
    config.validate()?;

    let mut planned = Vec::new();
    for (source, entries) in priors {
        if entries.is_empty() {
            debug!(source = %source, "no priors for source, skipping");
            continue;
        }
        for (prior, entry) in entries {
            let category = PriorCategory::classify(source, prior);
            entry.validate(&format!("{source}_{prior}"), category)?;
            planned.push((source.as_str(), prior.as_str(), entry, category));
        }
    }

    let path = config.output_path();
    let mut file = netcdf::create(&path)?;

    let production_date = chrono::Local::now()
        .format(PRODUCTION_DATE_FORMAT)
        .to_string();
    file.add_attribute("author", config.author.as_str())?;
    file.add_attribute("contact", config.contact.as_str())?;
    file.add_attribute("sos_file", config.sos_file.as_str())?;
    file.add_attribute("production_date", production_date.as_str())?;

    for (source, prior, entry, category) in &planned {
        let mut group = file.add_group(&format!("{source}_{prior}"))?;
        group.add_attribute("run_type", entry.run_type.as_str())?;
        write_group(&mut group, source, entry, *category)?;
        debug!(source, prior, category = ?category, "packed prior group");
    }

    info!(
        path = %path.display(),
        n_groups = planned.len(),
        "exchange file written"
    );
    Ok(path)
}

fn write_group(
    group: &mut netcdf::GroupMut<'_>,
    source: &str,
    entry: &PriorEntry,
    category: PriorCategory,
) -> Result<(), IoError> {
    // Presence checked by PriorEntry::validate.
    let (kind, ids) = entry.ids().ok_or_else(|| IoError::Validation {
        count: 1,
        details: "no identifiers".to_string(),
    })?;
    let n = ids.len();
    let leading = kind.dimension();

    // -- Dimensions ---------------------------------------------------------

    group.add_dimension(leading, n)?;
    let mut axes = source_axes(source).to_vec();
    if let Some(axis) = category.secondary_axis()
        && !axes.contains(&axis)
    {
        axes.push(axis);
    }
    for axis in axes {
        match axis.fixed_len() {
            Some(len) => group.add_dimension(axis.dimension(), len)?,
            None => group.add_unlimited_dimension(axis.dimension())?,
        };
    }
    if source == "usgs" {
        group.add_dimension("nchars", USGS_NCHARS)?;
    }

    // -- Identifier and index variables -------------------------------------

    group
        .add_variable::<i64>(kind.variable(), &[leading])?
        .put_values(ids, ..)?;

    let indexes: Vec<i32> = entry.indexes.iter().map(|&i| i as i32).collect();
    group
        .add_variable::<i32>("indexes", &[leading])?
        .put_values(&indexes, ..)?;

    // -- Values -------------------------------------------------------------

    let (flat, cols) = entry.values.flatten();
    let dims: Vec<&str> = match category.secondary_axis() {
        Some(axis) => vec![leading, axis.dimension()],
        None => vec![leading],
    };

    macro_rules! put_prior_values {
        ($ty:ty) => {{
            let data: Vec<$ty> = flat.iter().map(|&v| v as $ty).collect();
            let mut var = group.add_variable::<$ty>("prior_values", &dims)?;
            match cols {
                Some(k) => var.put_values(&data, (0..n, 0..k))?,
                None => var.put_values(&data, ..)?,
            }
        }};
    }
    match entry.data_type {
        DataType::F8 => put_prior_values!(f64),
        DataType::F4 => put_prior_values!(f32),
        DataType::I8 => put_prior_values!(i64),
        DataType::I4 => put_prior_values!(i32),
    }

    if category.has_time_labels()
        && let Some(rows) = &entry.value_t
    {
        let days = rows.first().map_or(0, Vec::len);
        let labels: Vec<f64> = rows.iter().flatten().copied().collect();
        group
            .add_variable::<f64>("value_t", &[leading, SecondaryAxis::Days.dimension()])?
            .put_values(&labels, (0..n, 0..days))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_from_author_and_sos() {
        let cfg = PackConfig::new("Jane Doe", "jane@example.org", "na_sword_v16_SOS_priors.nc", "/tmp");
        assert_eq!(cfg.file_name(), "jane_doe_na.nc");
        assert_eq!(cfg.output_path(), PathBuf::from("/tmp/jane_doe_na.nc"));
    }

    #[test]
    fn file_name_without_underscore_in_sos() {
        let cfg = PackConfig::new("A B C", "", "sos.nc", "/tmp");
        assert_eq!(cfg.file_name(), "a_b_c_sos.nc.nc");
    }

    #[test]
    fn builder_sets_output_dir() {
        let cfg = PackConfig::new("a", "b", "c", "/x").with_output_dir("/y");
        assert_eq!(cfg.output_dir(), Path::new("/y"));
        assert_eq!(cfg.author(), "a");
        assert_eq!(cfg.sos_file(), "c");
    }

    #[test]
    fn validate_empty_fields() {
        let cfg = PackConfig::new(" ", "", "", "/tmp");
        match cfg.validate().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("author"));
                assert!(details.contains("sos_file"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn validate_missing_output_dir() {
        let cfg = PackConfig::new("a", "b", "c_d.nc", "/definitely/not/a/dir");
        assert!(matches!(cfg.validate(), Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn source_axes_table() {
        assert_eq!(source_axes("wbm").len(), 2);
        assert!(source_axes("usgs").contains(&SecondaryAxis::Days));
        assert!(!source_axes("grades").contains(&SecondaryAxis::Days));
        assert!(source_axes("gbnode").is_empty());
    }
}
