//! Write-and-verify driver.

use ndarray::Array2;
use sos_align::{AlignError, align_time_axis, resolve_offsets};
use sos_io::{ExchangeFile, PriorRecord, RecordKey, SosFile};
use sos_schema::{IdLocation, route};
use tracing::{debug, info, info_span, warn};

use crate::config::MergeConfig;
use crate::dataset::SosDataset;
use crate::error::{AlignAxis, MergeError};
use crate::status::{MergeReport, MergeStatus, Outcome};
use crate::verify::Tolerance;

/// Reads the destination identifiers a record is matched against.
///
/// Returns the record's own identifiers alongside the SoS identifier table
/// picked by [`IdLocation::resolve`].
///
/// # Errors
///
/// Returns [`MergeError::Io`] if the identifier variable cannot be read.
pub fn resolve_ids<'r, D: SosDataset>(
    record: &'r PriorRecord,
    sos: &D,
) -> Result<(&'r [i64], Vec<i64>), MergeError> {
    let location = IdLocation::resolve(record.key().source(), record.id_kind());
    let store_ids = sos.read_ids(location.path())?;
    Ok((record.ids(), store_ids))
}

fn alignment_error(key: &RecordKey, axis: AlignAxis, cause: AlignError) -> MergeError {
    MergeError::Alignment {
        tag: key.source().to_string(),
        prior: key.prior().to_string(),
        run_type: key.run_type().to_string(),
        axis,
        cause,
    }
}

/// Checks that the payload fits the destination variable and returns its rank.
fn check_shape(record: &PriorRecord, var_path: &str, shape: &[usize]) -> Result<usize, MergeError> {
    let mismatch = |details: String| MergeError::ShapeMismatch {
        variable: var_path.to_string(),
        details,
    };
    let ncols = record.values().ncols();
    match (shape.len(), record.time_labels()) {
        (1, None) if ncols == 1 => {}
        (1, None) => {
            return Err(mismatch(format!(
                "payload has {ncols} columns but the variable is 1-D"
            )));
        }
        (1, Some(_)) => {
            return Err(mismatch("time-labelled payload for a 1-D variable".to_string()));
        }
        (2, Some(_)) => {}
        (2, None) if ncols == shape[1] => {}
        (2, None) => {
            return Err(mismatch(format!(
                "payload has {ncols} columns, variable has {}",
                shape[1]
            )));
        }
        (rank, _) => {
            return Err(mismatch(format!("unsupported rank {rank}")));
        }
    }
    Ok(shape.len())
}

/// Overwrites one record in `sos` and verifies it by reading it back.
///
/// Payload rows go to the record's precomputed `indexes`. The rows read back
/// for comparison come from matching the record's identifiers against the SoS
/// identifier table. For daily priors the payload columns are placed by
/// matching the record's time labels against the first row of `{prior}t`.
///
/// # Errors
///
/// Returns [`MergeError::Alignment`] if an identifier or time label is
/// missing or ambiguous in the SoS, [`MergeError::ShapeMismatch`] or
/// [`MergeError::IndexOutOfRange`] if the payload does not fit, and
/// [`MergeError::Io`] for store failures. Nothing is written when alignment
/// or shape checks fail.
pub fn merge_record<D: SosDataset>(
    record: &PriorRecord,
    sos: &mut D,
    tolerance: Tolerance,
) -> Result<MergeStatus, MergeError> {
    let key = record.key();
    let var_path = format!("{}/{}", route(key.source()), key.prior());
    let values = record.values();

    if record.is_empty() {
        debug!(variable = %var_path, "empty record, nothing to write");
        return Ok(MergeStatus::new(key.clone(), Outcome::Overwritten));
    }

    let shape = sos.shape(&var_path)?;
    let rank = check_shape(record, &var_path, &shape)?;
    if let Some(&index) = record.indexes().iter().find(|&&i| i >= shape[0]) {
        return Err(MergeError::IndexOutOfRange {
            variable: var_path,
            index,
            len: shape[0],
        });
    }

    let columns: Vec<usize> = match record.time_labels() {
        Some(labels) => {
            let store_labels = sos.read_time_row(&format!("{var_path}t"))?;
            align_time_axis(labels, &store_labels)
                .map_err(|e| alignment_error(key, AlignAxis::Time, e))?
        }
        None => (0..values.ncols()).collect(),
    };
    if rank == 2 && let Some(&col) = columns.iter().find(|&&c| c >= shape[1]) {
        return Err(MergeError::IndexOutOfRange {
            variable: format!("{var_path} (column)"),
            index: col,
            len: shape[1],
        });
    }

    let (source_ids, store_ids) = resolve_ids(record, sos)?;
    let check_rows = resolve_offsets(source_ids, &store_ids)
        .map_err(|e| alignment_error(key, AlignAxis::Identifier, e))?;

    for (i, &row) in record.indexes().iter().enumerate() {
        for (j, &col) in columns.iter().enumerate() {
            let cell = [row, col];
            sos.write_cell(&var_path, &cell[..rank], values[[i, j]])?;
        }
    }

    let mut read_back = Array2::<f64>::zeros(values.dim());
    for (i, &row) in check_rows.iter().enumerate() {
        for (j, &col) in columns.iter().enumerate() {
            let cell = [row, col];
            read_back[[i, j]] = sos.read_cell(&var_path, &cell[..rank])?;
        }
    }

    let outcome = if tolerance.all_close(values, &read_back) {
        Outcome::Overwritten
    } else {
        warn!(variable = %var_path, run_type = key.run_type(), "read-back mismatch");
        Outcome::NotOverwritten
    };
    Ok(MergeStatus::new(key.clone(), outcome))
}

/// Merges records one after another, opening a fresh store for each.
///
/// `open` is called once per record and the store is dropped before the next
/// record is processed. `on_status` sees every status as soon as it exists,
/// so progress is visible even if a later record stops the run.
///
/// # Errors
///
/// Stops at the first [`MergeError`]; records already merged stay written.
pub fn merge_records<D, F, S>(
    records: &[PriorRecord],
    mut open: F,
    tolerance: Tolerance,
    mut on_status: S,
) -> Result<MergeReport, MergeError>
where
    D: SosDataset,
    F: FnMut(&RecordKey) -> Result<D, MergeError>,
    S: FnMut(&MergeStatus),
{
    let mut report = MergeReport::default();
    for record in records {
        let key = record.key();
        let _span = info_span!("record", group = %key.group_name(), run_type = key.run_type())
            .entered();

        let status = {
            let mut sos = open(key)?;
            merge_record(record, &mut sos, tolerance)?
        };
        debug!(outcome = ?status.outcome(), "record merged");
        on_status(&status);
        report.push(status);
    }
    info!(
        overwritten = report.n_overwritten(),
        failed = report.n_failed(),
        "merge complete"
    );
    Ok(report)
}

/// Merges every group of an exchange file into the SoS files under
/// `config.sos_dir()`.
///
/// The SoS for a record lives at `{sos_dir}/{run_type}/{sos_file}`, where
/// `sos_file` comes from the exchange file's global attributes.
///
/// # Errors
///
/// Returns [`MergeError::InvalidConfig`] for bad settings, otherwise see
/// [`merge_records`].
pub fn merge_exchange<S: FnMut(&MergeStatus)>(
    exchange: &ExchangeFile,
    config: &MergeConfig,
    on_status: S,
) -> Result<MergeReport, MergeError> {
    config.validate()?;
    let sos_file = exchange.metadata().sos_file.as_str();
    info!(
        exchange = %exchange.path().display(),
        sos_file,
        records = exchange.records().len(),
        "merging exchange file"
    );
    merge_records(
        exchange.records(),
        |key| {
            let path = config.sos_path(key.run_type(), sos_file);
            Ok(SosFile::open(&path)?)
        },
        config.tolerance(),
        on_status,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use ndarray::{Array2, array};
    use sos_io::IoError;
    use sos_schema::IdKind;

    use super::*;

    /// Row-major in-memory store.
    #[derive(Debug, Default)]
    struct MemStore {
        vars: HashMap<String, (Vec<usize>, Vec<f64>)>,
    }

    impl MemStore {
        fn with_var(mut self, path: &str, shape: &[usize], data: Vec<f64>) -> Self {
            assert_eq!(shape.iter().product::<usize>(), data.len());
            self.vars.insert(path.to_string(), (shape.to_vec(), data));
            self
        }

        fn var(&self, path: &str) -> Result<&(Vec<usize>, Vec<f64>), MergeError> {
            self.vars.get(path).ok_or_else(|| {
                MergeError::Io(IoError::MissingVariable {
                    name: path.to_string(),
                    path: PathBuf::from("memory"),
                })
            })
        }

        fn data(&self, path: &str) -> &[f64] {
            &self.vars[path].1
        }

        fn flat(shape: &[usize], index: &[usize]) -> usize {
            match index {
                [i] => *i,
                [i, j] => i * shape[1] + j,
                _ => unreachable!(),
            }
        }
    }

    impl SosDataset for MemStore {
        fn shape(&self, var_path: &str) -> Result<Vec<usize>, MergeError> {
            Ok(self.var(var_path)?.0.clone())
        }

        fn read_ids(&self, var_path: &str) -> Result<Vec<i64>, MergeError> {
            Ok(self.var(var_path)?.1.iter().map(|&v| v as i64).collect())
        }

        fn read_time_row(&self, var_path: &str) -> Result<Vec<f64>, MergeError> {
            let (shape, data) = self.var(var_path)?;
            let width = if shape.len() == 2 { shape[1] } else { shape[0] };
            Ok(data[..width].to_vec())
        }

        fn write_cell(
            &mut self,
            var_path: &str,
            index: &[usize],
            value: f64,
        ) -> Result<(), MergeError> {
            self.var(var_path)?;
            let (shape, data) = self.vars.get_mut(var_path).unwrap();
            let at = Self::flat(shape, index);
            data[at] = value;
            Ok(())
        }

        fn read_cell(&self, var_path: &str, index: &[usize]) -> Result<f64, MergeError> {
            let (shape, data) = self.var(var_path)?;
            Ok(data[Self::flat(shape, index)])
        }
    }

    fn scalar_record(
        source: &str,
        prior: &str,
        ids: Vec<i64>,
        indexes: Vec<i64>,
        values: Vec<f64>,
    ) -> PriorRecord {
        let n = values.len();
        PriorRecord::new(
            RecordKey::new(source, prior, "constrained"),
            IdKind::Reach,
            ids,
            indexes,
            Array2::from_shape_vec((n, 1), values).unwrap(),
        )
        .unwrap()
    }

    fn reach_store() -> MemStore {
        MemStore::default()
            .with_var("reaches/reach_id", &[3], vec![30.0, 10.0, 20.0])
            .with_var("model/mean_q", &[3], vec![0.0; 3])
    }

    #[test]
    fn writes_by_identifier_and_verifies() {
        let mut sos = reach_store();
        let record = scalar_record("wbm", "mean_q", vec![20, 30], vec![2, 0], vec![5.5, 7.7]);
        let status = merge_record(&record, &mut sos, Tolerance::default()).unwrap();
        assert_eq!(status.outcome(), Outcome::Overwritten);
        assert_eq!(sos.data("model/mean_q"), &[7.7, 0.0, 5.5]);
    }

    #[test]
    fn wrong_precomputed_indexes_fail_verification() {
        let mut sos = reach_store();
        let record = scalar_record("wbm", "mean_q", vec![20, 30], vec![0, 2], vec![5.5, 7.7]);
        let status = merge_record(&record, &mut sos, Tolerance::default()).unwrap();
        assert_eq!(status.outcome(), Outcome::NotOverwritten);
        assert!(status.to_string().starts_with("FAILURE: WBM: 'mean_q'"));
    }

    #[test]
    fn missing_identifier_is_fatal_and_writes_nothing() {
        let mut sos = reach_store();
        let record = scalar_record("wbm", "mean_q", vec![20, 99], vec![2, 0], vec![5.5, 7.7]);
        let err = merge_record(&record, &mut sos, Tolerance::default()).unwrap_err();
        match err {
            MergeError::Alignment { axis, cause, .. } => {
                assert_eq!(axis, AlignAxis::Identifier);
                assert_eq!(cause, AlignError::Missing { id: 99 });
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(sos.data("model/mean_q"), &[0.0; 3]);
    }

    #[test]
    fn daily_columns_follow_time_labels() {
        let mut sos = MemStore::default()
            .with_var("model/grdc/grdc_reach_id", &[2], vec![10.0, 20.0])
            .with_var("model/grdc/grdc_q", &[2, 3], vec![0.0; 6])
            .with_var(
                "model/grdc/grdc_qt",
                &[2, 3],
                vec![2001.0, 2003.0, 2002.0, 2001.0, 2003.0, 2002.0],
            );
        let record = PriorRecord::new(
            RecordKey::new("grdc", "grdc_q", "constrained"),
            IdKind::Reach,
            vec![20, 10],
            vec![1, 0],
            array![[1.0, 2.0], [3.0, 4.0]],
        )
        .unwrap()
        .with_time_labels(vec![2002.0, 2001.0])
        .unwrap();

        let status = merge_record(&record, &mut sos, Tolerance::default()).unwrap();
        assert!(status.is_success());
        // row 1 (id 20): column 0 -> offset 2, column 1 -> offset 0
        assert_eq!(
            sos.data("model/grdc/grdc_q"),
            &[4.0, 0.0, 3.0, 2.0, 0.0, 1.0]
        );
    }

    #[test]
    fn unknown_time_label_is_fatal() {
        let mut sos = MemStore::default()
            .with_var("model/grdc/grdc_reach_id", &[1], vec![10.0])
            .with_var("model/grdc/grdc_q", &[1, 2], vec![0.0; 2])
            .with_var("model/grdc/grdc_qt", &[1, 2], vec![2001.0, 2002.0]);
        let record = PriorRecord::new(
            RecordKey::new("grdc", "grdc_q", "constrained"),
            IdKind::Reach,
            vec![10],
            vec![0],
            array![[1.0]],
        )
        .unwrap()
        .with_time_labels(vec![1999.0])
        .unwrap();
        let err = merge_record(&record, &mut sos, Tolerance::default()).unwrap_err();
        assert!(matches!(
            err,
            MergeError::Alignment {
                axis: AlignAxis::Time,
                ..
            }
        ));
    }

    #[test]
    fn monthly_rows_written_whole() {
        let mut sos = MemStore::default()
            .with_var("reaches/reach_id", &[2], vec![1.0, 2.0])
            .with_var("model/monthly_q", &[2, 2], vec![0.0; 4]);
        let record = PriorRecord::new(
            RecordKey::new("grades", "monthly_q", "unconstrained"),
            IdKind::Reach,
            vec![2],
            vec![1],
            array![[8.0, 9.0]],
        )
        .unwrap();
        let status = merge_record(&record, &mut sos, Tolerance::default()).unwrap();
        assert!(status.is_success());
        assert_eq!(sos.data("model/monthly_q"), &[0.0, 0.0, 8.0, 9.0]);
    }

    #[test]
    fn column_count_mismatch_rejected() {
        let mut sos = MemStore::default()
            .with_var("reaches/reach_id", &[1], vec![1.0])
            .with_var("model/monthly_q", &[1, 12], vec![0.0; 12]);
        let record = scalar_record("wbm", "monthly_q", vec![1], vec![0], vec![3.0]);
        let err = merge_record(&record, &mut sos, Tolerance::default()).unwrap_err();
        assert!(matches!(err, MergeError::ShapeMismatch { .. }));
    }

    #[test]
    fn index_out_of_range_rejected() {
        let mut sos = reach_store();
        let record = scalar_record("wbm", "mean_q", vec![20], vec![7], vec![1.0]);
        let err = merge_record(&record, &mut sos, Tolerance::default()).unwrap_err();
        assert!(matches!(err, MergeError::IndexOutOfRange { index: 7, len: 3, .. }));
    }

    #[test]
    fn node_priors_match_node_table() {
        let mut sos = MemStore::default()
            .with_var("nodes/node_id", &[3], vec![100.0, 200.0, 300.0])
            .with_var("gbpriors/node/logn_hat", &[3], vec![0.0; 3]);
        let record = PriorRecord::new(
            RecordKey::new("gbnode", "logn_hat", "constrained"),
            IdKind::Node,
            vec![300, 100],
            vec![2, 0],
            array![[-3.4], [-3.2]],
        )
        .unwrap();
        let status = merge_record(&record, &mut sos, Tolerance::default()).unwrap();
        assert!(status.is_success());
        assert_eq!(sos.data("gbpriors/node/logn_hat"), &[-3.2, 0.0, -3.4]);
    }

    #[test]
    fn empty_record_touches_nothing() {
        let mut sos = MemStore::default();
        let record = scalar_record("wbm", "mean_q", vec![], vec![], vec![]);
        let status = merge_record(&record, &mut sos, Tolerance::default()).unwrap();
        assert!(status.is_success());
    }

    #[test]
    fn driver_continues_after_verification_failure() {
        let records = vec![
            scalar_record("wbm", "mean_q", vec![20, 30], vec![0, 2], vec![5.5, 7.7]),
            scalar_record("wbm", "mean_q", vec![10], vec![1], vec![1.5]),
        ];
        let mut opened = 0;
        let mut lines = Vec::new();
        let report = merge_records(
            &records,
            |_| {
                opened += 1;
                Ok(reach_store())
            },
            Tolerance::default(),
            |s| lines.push(s.to_string()),
        )
        .unwrap();
        assert_eq!(opened, 2);
        assert_eq!(report.n_failed(), 1);
        assert_eq!(report.n_overwritten(), 1);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("FAILURE"));
        assert_eq!(
            lines[1],
            "WBM: 'mean_q' has been overwritten in the SoS (constrained)."
        );
    }

    #[test]
    fn driver_stops_on_alignment_error() {
        let records = vec![
            scalar_record("wbm", "mean_q", vec![10], vec![1], vec![1.5]),
            scalar_record("wbm", "mean_q", vec![42], vec![0], vec![1.0]),
            scalar_record("wbm", "mean_q", vec![20], vec![2], vec![2.0]),
        ];
        let mut seen = 0;
        let err = merge_records(
            &records,
            |_| Ok(reach_store()),
            Tolerance::default(),
            |_| seen += 1,
        )
        .unwrap_err();
        assert_eq!(seen, 1);
        assert!(err.to_string().contains("identifier 42 not found"));
    }
}
