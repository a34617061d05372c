//! Integration tests for directory consolidation.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use camt_model::{Field, FieldCatalog, FieldSelection};
use camt_transform::{FileOutcome, TransformError, consolidate, consolidate_with};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata/camt054")
        .join(name)
}

/// Copy fixtures into a fresh directory under the given file names.
fn statement_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (fixture_name, target) in files {
        fs::copy(fixture(fixture_name), dir.path().join(target)).expect("copy fixture");
    }
    dir
}

fn selection(names: &[&str]) -> FieldSelection {
    FieldSelection::parse(&FieldCatalog::default(), names.iter().copied()).expect("selection")
}

#[test]
fn valid_and_malformed_file() {
    let dir = statement_dir(&[
        ("notification_full.xml", "a.xml"),
        ("notification_malformed.xml", "b.xml"),
    ]);
    let fields = selection(&["Booking Date", "Transaction Amount", "Transaction Currency"]);

    let result = consolidate(dir.path(), &fields).expect("consolidate");

    assert_eq!(result.record_set.height(), 3);
    assert_eq!(result.success_count, 1);
    assert_eq!(result.files_scanned, 2);
    assert_eq!(result.file_issues.len(), 1);
    assert!(result.file_issues[0].path.ends_with("b.xml"));
    assert_eq!(
        result.record_set.value(2, Field::TransactionAmount),
        Some("20.00")
    );
}

#[test]
fn unbound_prefix_skips_the_whole_file() {
    let dir = TempDir::new().expect("create temp dir");
    let xml = r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.054.001.04">
  <Ntry><BookgDt><Dt>2024-05-02</Dt></BookgDt><NtryDtls><TxDtls/></NtryDtls></Ntry>
  <x:Foo/>
</Document>"#;
    fs::write(dir.path().join("stray.xml"), xml).expect("write statement");
    let fields = selection(&["Booking Date"]);

    let result = consolidate(dir.path(), &fields).expect("consolidate");

    assert_eq!(result.record_set.height(), 0);
    assert_eq!(result.success_count, 0);
    assert_eq!(result.file_issues.len(), 1);
    assert!(result.file_issues[0].message.contains("unbound prefix"));
}

#[test]
fn empty_directory() {
    let dir = TempDir::new().expect("create temp dir");
    let fields = selection(&["Booking Date"]);

    let result = consolidate(dir.path(), &fields).expect("consolidate");

    assert_eq!(result.record_set.height(), 0);
    assert_eq!(result.record_set.width(), 1);
    assert_eq!(result.record_set.column_labels(), vec!["Booking Date"]);
    assert_eq!(result.success_count, 0);
    assert_eq!(result.files_scanned, 0);
}

#[test]
fn columns_follow_catalog_order_not_request_order() {
    let dir = statement_dir(&[("notification_single.xml", "one.xml")]);
    let fields = selection(&["Debtor Name", "Charge 1 Type", "Booking Date"]);

    let result = consolidate(dir.path(), &fields).expect("consolidate");

    assert_eq!(
        result.record_set.column_labels(),
        vec!["Booking Date", "Debtor Name", "Charge 1 Type"]
    );
    assert_eq!(result.record_set.value(0, Field::DebtorName), Some("Einzel Kunde"));
}

#[test]
fn rows_follow_file_name_order() {
    let dir = statement_dir(&[
        ("notification_single.xml", "2024-06.xml"),
        ("notification_full.xml", "2024-05.xml"),
    ]);
    let fields = selection(&["Booking Date"]);

    let result = consolidate(dir.path(), &fields).expect("consolidate");

    let dates = result.record_set.column_values(Field::BookingDate);
    assert_eq!(
        dates,
        vec![
            Some("2024-05-02"),
            Some("2024-05-02"),
            Some("2024-05-06"),
            Some("2024-06-10"),
        ]
    );
    assert_eq!(result.success_count, 2);
}

#[test]
fn empty_file_does_not_count_as_success() {
    let dir = statement_dir(&[
        ("notification_empty.xml", "empty.xml"),
        ("notification_single.xml", "single.xml"),
    ]);
    let fields = selection(&["Value Date"]);

    let mut outcomes: Vec<(String, FileOutcome)> = Vec::new();
    let result = consolidate_with(dir.path(), &fields, |path: &Path, outcome: &FileOutcome| {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        outcomes.push((name, outcome.clone()));
    })
    .expect("consolidate");

    assert_eq!(result.success_count, 1);
    assert!(result.file_issues.is_empty());
    assert_eq!(
        outcomes,
        vec![
            ("empty.xml".to_string(), FileOutcome::Empty),
            ("single.xml".to_string(), FileOutcome::Parsed { rows: 1 }),
        ]
    );
}

#[test]
fn non_xml_files_are_ignored() {
    let dir = statement_dir(&[("notification_single.xml", "single.xml")]);
    fs::write(dir.path().join("readme.txt"), "not a statement").expect("write");
    fs::write(dir.path().join("broken.XML"), "<Document>").expect("write");

    let result = consolidate(dir.path(), &selection(&["Booking Date"])).expect("consolidate");

    assert_eq!(result.files_scanned, 1);
    assert!(result.file_issues.is_empty());
}

#[test]
fn missing_directory_is_fatal() {
    let dir = TempDir::new().expect("create temp dir");
    let missing = dir.path().join("nowhere");

    let err = consolidate(&missing, &selection(&["Booking Date"])).unwrap_err();
    assert!(matches!(err, TransformError::Ingest(_)));
}
