use std::fs::File;
use std::io::Write;

use thermolog_config::{CalibrationRow, load_calibration_csv};
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
fn loads_two_column_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calib.csv");

    let mut f = File::create(&path).unwrap();
    writeln!(f, "adc,voltage").unwrap();
    writeln!(f, "100,0.25").unwrap();
    writeln!(f, "2000, 1.75").unwrap();

    let rows = load_calibration_csv(&path).unwrap();
    assert_eq!(
        rows,
        vec![
            CalibrationRow {
                adc: 100.0,
                voltage: 0.25,
                uncertainty: None
            },
            CalibrationRow {
                adc: 2000.0,
                voltage: 1.75,
                uncertainty: None
            },
        ]
    );
}

#[rstest]
fn loads_uncertainty_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calib.csv");

    let mut f = File::create(&path).unwrap();
    writeln!(f, "adc,voltage,uncertainty").unwrap();
    writeln!(f, "100,0.25,0.01").unwrap();
    writeln!(f, "2000,1.75,0.02").unwrap();

    let rows = load_calibration_csv(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].uncertainty, Some(0.02));
}

#[rstest]
fn csv_with_wrong_header_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad_headers.csv");

    let mut f = File::create(&path).unwrap();
    writeln!(f, "raw,grams").unwrap();
    writeln!(f, "100,0.0").unwrap();

    let err = load_calibration_csv(&path).expect_err("should error on bad headers");
    assert!(format!("{err}").contains("headers 'adc,voltage[,uncertainty]'"));
}

#[rstest]
fn csv_with_non_numeric_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad_numeric.csv");

    let mut f = File::create(&path).unwrap();
    writeln!(f, "adc,voltage").unwrap();
    writeln!(f, "abc,xyz").unwrap();

    let err = load_calibration_csv(&path).expect_err("should error on non-numeric");
    assert!(format!("{err}").contains("invalid CSV row 2"));
}

#[rstest]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = load_calibration_csv(&path).expect_err("missing file");
    assert!(format!("{err}").contains("open calibration CSV"));
}
