//! Integration tests for in-place SoS access.

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use sos_io::{IoError, SosFile};
use tempfile::tempdir;

/// Minimal SoS: `reaches/reach_id` plus a `model/grdc` group with a daily
/// prior and its time labels.
fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("na_sword_v16_SOS_priors.nc");
    let mut file = netcdf::create(&path).expect("create SoS fixture");

    {
        let mut reaches = file.add_group("reaches").expect("add reaches");
        reaches.add_dimension("num_reaches", 3).expect("dim");
        reaches
            .add_variable::<i64>("reach_id", &["num_reaches"])
            .expect("add reach_id")
            .put_values(&[30_i64, 10, 20], ..)
            .expect("put reach_id");
    }
    {
        let mut model = file.add_group("model").expect("add model");
        let mut grdc = model.add_group("grdc").expect("add grdc");
        grdc.add_dimension("num_reaches", 3).expect("dim");
        grdc.add_dimension("num_days", 4).expect("dim");
        grdc.add_variable::<f64>("grdc_q", &["num_reaches", "num_days"])
            .expect("add grdc_q")
            .put_values(&[0.0_f64; 12], ..)
            .expect("put grdc_q");
        let labels: Vec<f64> = (0..3)
            .flat_map(|_| [2001.0, 2003.0, 2002.0, 2004.0])
            .collect();
        grdc.add_variable::<f64>("grdc_qt", &["num_reaches", "num_days"])
            .expect("add grdc_qt")
            .put_values(&labels, ..)
            .expect("put grdc_qt");
    }

    path
}

#[test]
fn reads_ids_and_time_row_by_path() {
    let dir = tempdir().unwrap();
    let sos = SosFile::open(&write_fixture(dir.path())).unwrap();

    assert_eq!(sos.read_ids("reaches/reach_id").unwrap(), vec![30, 10, 20]);
    assert_eq!(
        sos.read_first_row("model/grdc/grdc_qt").unwrap(),
        vec![2001.0, 2003.0, 2002.0, 2004.0]
    );
    assert_eq!(sos.shape("model/grdc/grdc_q").unwrap(), vec![3, 4]);
}

#[test]
fn cell_writes_persist_after_close() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path());

    let mut sos = SosFile::open(&path).unwrap();
    sos.put_cell("model/grdc/grdc_q", &[2, 1], 7.25).unwrap();
    assert_relative_eq!(sos.get_cell("model/grdc/grdc_q", &[2, 1]).unwrap(), 7.25);
    sos.close();

    let sos = SosFile::open(&path).unwrap();
    assert_relative_eq!(sos.get_cell("model/grdc/grdc_q", &[2, 1]).unwrap(), 7.25);
    assert_relative_eq!(sos.get_cell("model/grdc/grdc_q", &[0, 0]).unwrap(), 0.0);
}

#[test]
fn missing_variable_is_structural_error() {
    let dir = tempdir().unwrap();
    let mut sos = SosFile::open(&write_fixture(dir.path())).unwrap();

    assert!(matches!(
        sos.read_ids("reaches/node_id"),
        Err(IoError::MissingVariable { .. })
    ));
    assert!(matches!(
        sos.put_cell("model/monthly_q", &[0, 0], 1.0),
        Err(IoError::MissingVariable { .. })
    ));
}

#[test]
fn missing_group_named_in_error() {
    let dir = tempdir().unwrap();
    let mut sos = SosFile::open(&write_fixture(dir.path())).unwrap();

    match sos.read_ids("model/usgs/usgs_reach_id") {
        Err(IoError::MissingGroup { name, .. }) => assert_eq!(name, "model/usgs"),
        other => panic!("expected MissingGroup, got {other:?}"),
    }
    match sos.put_cell("gbpriors/node/logn_hat", &[0], 1.0) {
        Err(IoError::MissingGroup { name, .. }) => assert_eq!(name, "gbpriors/node"),
        other => panic!("expected MissingGroup, got {other:?}"),
    }
}

#[test]
fn rank_three_index_rejected() {
    let dir = tempdir().unwrap();
    let sos = SosFile::open(&write_fixture(dir.path())).unwrap();
    assert!(matches!(
        sos.get_cell("model/grdc/grdc_q", &[0, 0, 0]),
        Err(IoError::DimensionMismatch { got: 3, .. })
    ));
}

#[test]
fn open_missing_file() {
    assert!(matches!(
        SosFile::open(Path::new("/no/such/sos.nc")),
        Err(IoError::FileNotFound { .. })
    ));
}
