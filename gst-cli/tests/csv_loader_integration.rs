//! Integration tests that exercise the loader against an on-disk fixture file.
//!
//! These complement the unit tests inside csv_loader.rs (which all use
//! inline string literals) by verifying that the full read-from-disk path
//! works end-to-end.

use std::io::Write;
use std::path::{Path, PathBuf};

use gst_cli::{app, csv_loader};
use gst_core::{CalculationInput, DEFAULT_RATE, Jurisdiction, PriceBasis};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_inputs.csv")
}

#[test]
fn test_load_fixture_file_succeeds() {
    let inputs = csv_loader::load_from_file(&fixture_path(), DEFAULT_RATE)
        .expect("fixture file should load without error");

    // The fixture has exactly 4 rows.
    assert_eq!(inputs.len(), 4);
}

#[test]
fn test_load_fixture_rows() {
    let inputs = csv_loader::load_from_file(&fixture_path(), DEFAULT_RATE).unwrap();

    assert_eq!(
        inputs[0],
        CalculationInput::new(dec!(1000), dec!(18), PriceBasis::Exclusive, Jurisdiction::IntraState)
    );
    assert_eq!(
        inputs[1],
        CalculationInput::new(dec!(1180), dec!(18), PriceBasis::Inclusive, Jurisdiction::InterState)
    );
    assert_eq!(inputs[2].amount, dec!(2500.50));
    assert_eq!(inputs[2].rate, dec!(5));
}

#[test]
fn test_fixture_empty_cells_use_defaults() {
    let inputs = csv_loader::load_from_file(&fixture_path(), dec!(28)).unwrap();
    let last = &inputs[3];

    assert_eq!(last.rate, dec!(28));
    assert_eq!(last.price_basis, PriceBasis::Inclusive);
    assert_eq!(last.jurisdiction, Jurisdiction::IntraState);
}

#[test]
fn test_batch_report_has_one_line_per_row() {
    let report = app::batch(&fixture_path(), DEFAULT_RATE).expect("batch should succeed");
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("total ₹1,180.00"));
    assert!(lines[1].contains("net ₹1,000.00"));
    assert!(lines[2].contains("total ₹2,625.53"));
}

#[test]
fn test_batch_reports_offending_row_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "amount,basis\n100,excl\n200,net").expect("write csv");

    let err = app::batch(file.path(), DEFAULT_RATE).unwrap_err();

    assert_eq!(err.to_string(), "unrecognised basis 'net' on row 2");
}
