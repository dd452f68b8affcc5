//! Exchange-file reader.

use std::path::{Path, PathBuf};

use sos_schema::IdKind;
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;
use crate::record::{PriorRecord, RecordKey};

/// Global attributes of an exchange file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeMetadata {
    /// Name of the SoS file the priors are meant for (no directory).
    pub sos_file: String,
    /// Author of the priors.
    pub author: Option<String>,
    /// Contact address of the author.
    pub contact: Option<String>,
    /// When the exchange file was produced.
    pub production_date: Option<String>,
}

/// A fully loaded exchange file.
#[derive(Debug, Clone)]
pub struct ExchangeFile {
    path: PathBuf,
    metadata: ExchangeMetadata,
    records: Vec<PriorRecord>,
}

impl ExchangeFile {
    /// Path the file was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Global attributes.
    pub fn metadata(&self) -> &ExchangeMetadata {
        &self.metadata
    }

    /// Records in file group order.
    pub fn records(&self) -> &[PriorRecord] {
        &self.records
    }
}

/// Read only the `sos_file` global attribute of an exchange file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] or [`IoError::MissingAttribute`].
pub fn locate_sos_file(path: &Path) -> Result<String, IoError> {
    let file = netcdf_read::open_file(path)?;
    netcdf_read::require_string(file.attribute("sos_file"), "sos_file", path)
}

/// Read every `{source}_{prior}` group of an exchange file.
///
/// Groups are keyed on `reach_id` when present, otherwise on `node_id`. A
/// `value_t` variable, when present, contributes its first row as the time
/// labels of the payload columns.
///
/// # Errors
///
/// Returns [`IoError`] on missing attributes or variables, malformed group
/// names, or records whose arrays disagree in length.
pub fn read_exchange(path: &Path) -> Result<ExchangeFile, IoError> {
    let file = netcdf_read::open_file(path)?;

    let metadata = ExchangeMetadata {
        sos_file: netcdf_read::require_string(file.attribute("sos_file"), "sos_file", path)?,
        author: netcdf_read::string_value(file.attribute("author")),
        contact: netcdf_read::string_value(file.attribute("contact")),
        production_date: netcdf_read::string_value(file.attribute("production_date")),
    };

    let records = file
        .groups()?
        .map(|group| read_record(&group, path))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        path = %path.display(),
        sos_file = %metadata.sos_file,
        n_records = records.len(),
        "exchange file loaded"
    );

    Ok(ExchangeFile {
        path: path.to_path_buf(),
        metadata,
        records,
    })
}

fn read_record(group: &netcdf::Group<'_>, path: &Path) -> Result<PriorRecord, IoError> {
    let name = group.name();
    let run_type = netcdf_read::require_string(
        group.attribute("run_type"),
        &format!("{name}/run_type"),
        path,
    )?;
    let key = RecordKey::from_group_name(&name, run_type)?;

    let (id_kind, id_var) = match (group.variable("reach_id"), group.variable("node_id")) {
        (Some(var), _) => (IdKind::Reach, var),
        (None, Some(var)) => (IdKind::Node, var),
        (None, None) => {
            return Err(IoError::MissingVariable {
                name: format!("{name}/reach_id"),
                path: path.to_path_buf(),
            });
        }
    };
    let ids = id_var.get_values::<i64, _>(..)?;

    let indexes = netcdf_read::require_variable(
        group.variable("indexes"),
        &format!("{name}/indexes"),
        path,
    )?
    .get_values::<i32, _>(..)?
    .into_iter()
    .map(i64::from)
    .collect();

    let values_name = format!("{name}/prior_values");
    let values_var =
        netcdf_read::require_variable(group.variable("prior_values"), &values_name, path)?;
    let values = netcdf_read::read_matrix(&values_var, &values_name)?;

    let mut record = PriorRecord::new(key, id_kind, ids, indexes, values)?;

    if let Some(var) = group.variable("value_t") {
        let labels = netcdf_read::read_first_row(&var, &format!("{name}/value_t"))?;
        record = record.with_time_labels(labels)?;
    }

    debug!(
        group = %name,
        id_kind = ?record.id_kind(),
        n = record.len(),
        timed = record.time_labels().is_some(),
        "read exchange group"
    );
    Ok(record)
}
