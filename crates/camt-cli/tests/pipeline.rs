//! Integration tests for the consolidation run.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use camt_cli::pipeline::run;
use camt_model::{ConsolidateRequest, Field, FieldCatalog, ModelError};
use camt_output::WriteOptions;
use camt_transform::FileOutcome;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata/camt054")
        .join(name)
}

fn statements(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (fixture_name, target) in files {
        fs::copy(fixture(fixture_name), dir.path().join(target)).unwrap();
    }
    dir
}

fn request(input: &Path, output: &Path, fields: &[&str]) -> ConsolidateRequest {
    ConsolidateRequest {
        input_dir: input.to_path_buf(),
        output_file: Some(output.to_path_buf()),
        fields: fields.iter().map(|name| (*name).to_string()).collect(),
        ..ConsolidateRequest::default()
    }
}

fn ignore_files(_: &Path, _: &FileOutcome) {}

#[test]
fn writes_output_when_all_fields_present() {
    let input = statements(&[
        ("notification_full.xml", "a.xml"),
        ("notification_malformed.xml", "b.xml"),
    ]);
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("out.csv");
    let req = request(
        input.path(),
        &output,
        &["Transaction Currency", "Booking Date", "Transaction Amount"],
    );

    let outcome = run(&req, WriteOptions::default(), ignore_files).unwrap();

    assert!(!outcome.validation_failed());
    assert_eq!(outcome.written.as_deref(), Some(output.as_path()));
    assert_eq!(outcome.consolidation.success_count, 1);
    assert_eq!(outcome.consolidation.file_issues.len(), 1);

    let bytes = fs::read(&output).unwrap();
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Booking Date,Transaction Amount,Transaction Currency",
            "2024-05-02,150.00,CHF",
            "2024-05-02,80.00,EUR",
            "2024-05-06,20.00,CHF",
        ]
    );
}

#[test]
fn validation_failure_withholds_output() {
    let input = statements(&[("notification_single.xml", "single.xml")]);
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("out.csv");
    let req = request(input.path(), &output, &["Booking Date", "Creditor Reference"]);

    let outcome = run(&req, WriteOptions::default(), ignore_files).unwrap();

    assert!(outcome.validation_failed());
    assert_eq!(outcome.presence.failing_field, Some(Field::CreditorReference));
    assert!(outcome.written.is_none());
    assert!(!output.exists());
}

#[test]
fn forced_write_despite_validation_failure() {
    let input = statements(&[("notification_single.xml", "single.xml")]);
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("out.csv");
    let mut req = request(input.path(), &output, &["Booking Date", "Creditor Reference"]);
    req.write_on_validation_failure = true;

    let outcome = run(&req, WriteOptions::default(), ignore_files).unwrap();

    assert!(outcome.validation_failed());
    assert!(output.is_file());
}

#[test]
fn dry_run_needs_no_output_and_writes_nothing() {
    let input = statements(&[("notification_single.xml", "single.xml")]);
    let req = ConsolidateRequest {
        input_dir: input.path().to_path_buf(),
        fields: vec!["Debtor Name".to_string()],
        dry_run: true,
        ..ConsolidateRequest::default()
    };

    let outcome = run(&req, WriteOptions::default(), ignore_files).unwrap();

    assert!(outcome.written.is_none());
    assert_eq!(outcome.consolidation.record_set.height(), 1);
    assert_eq!(outcome.report.fields[0].populated, 1);
}

#[test]
fn configuration_errors_precede_any_io() {
    let missing = PathBuf::from("/definitely/not/here");
    let req = request(&missing, Path::new("out.csv"), &[]);

    let err = run(&req, WriteOptions::default(), ignore_files).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ModelError>(),
        Some(&ModelError::EmptySelection)
    );
}

#[test]
fn progress_callback_sees_every_file() {
    let input = statements(&[
        ("notification_empty.xml", "1.xml"),
        ("notification_malformed.xml", "2.xml"),
        ("notification_single.xml", "3.xml"),
    ]);
    let req = ConsolidateRequest {
        input_dir: input.path().to_path_buf(),
        fields: vec!["Booking Date".to_string()],
        catalog: FieldCatalog::default(),
        dry_run: true,
        ..ConsolidateRequest::default()
    };

    let mut seen = Vec::new();
    run(&req, WriteOptions::default(), |path: &Path, outcome: &FileOutcome| {
        seen.push((path.file_name().unwrap().to_owned(), outcome.contributed()));
    })
    .unwrap();

    let contributed: Vec<bool> = seen.iter().map(|(_, contributed)| *contributed).collect();
    assert_eq!(contributed, vec![false, false, true]);
}
