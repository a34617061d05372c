//! Batch consolidation of a statement directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use camt_ingest::{CamtDocument, EntryExtractor, list_xml_files};
use camt_model::FieldSelection;

use crate::error::Result;
use crate::frame::RecordSet;
use crate::frame_builder::build_record_set;

/// What processing one file produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The file contributed `rows` records.
    Parsed { rows: usize },
    /// Well-formed, but without transaction details.
    Empty,
    /// Unreadable or not well-formed; the file was skipped.
    Malformed { message: String },
}

impl FileOutcome {
    /// Whether the file counts toward the success count.
    pub fn contributed(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }
}

/// A skipped file and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIssue {
    pub path: PathBuf,
    pub message: String,
}

/// Result of consolidating one directory.
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub record_set: RecordSet,
    /// Files that contributed at least one row.
    pub success_count: usize,
    /// Statement files found in the directory.
    pub files_scanned: usize,
    pub file_issues: Vec<FileIssue>,
}

/// Consolidate every statement file in `dir`.
pub fn consolidate(dir: &Path, selection: &FieldSelection) -> Result<Consolidation> {
    consolidate_with(dir, selection, |_, _| {})
}

/// Like [`consolidate`], calling `on_file` after each file is processed.
///
/// Files are processed in name order and rows keep file order, then
/// document order within a file.
pub fn consolidate_with<F>(
    dir: &Path,
    selection: &FieldSelection,
    mut on_file: F,
) -> Result<Consolidation>
where
    F: FnMut(&Path, &FileOutcome),
{
    let span = info_span!("consolidate", dir = %dir.display(), field_count = selection.len());
    let _guard = span.enter();
    let start = Instant::now();

    let files = list_xml_files(dir)?;
    let extractor = EntryExtractor::new(selection);
    let mut records = Vec::new();
    let mut success_count = 0;
    let mut file_issues = Vec::new();

    for path in &files {
        let outcome = match CamtDocument::from_path(path) {
            Ok(document) => {
                let extracted = extractor.extract(&document);
                if extracted.is_empty() {
                    FileOutcome::Empty
                } else {
                    let rows = extracted.len();
                    records.extend(extracted);
                    FileOutcome::Parsed { rows }
                }
            }
            Err(error) if error.is_per_file() => {
                warn!(path = %path.display(), error = %error, "skipping statement file");
                let message = error.to_string();
                file_issues.push(FileIssue {
                    path: path.clone(),
                    message: message.clone(),
                });
                FileOutcome::Malformed { message }
            }
            Err(error) => return Err(error.into()),
        };
        if outcome.contributed() {
            success_count += 1;
        }
        debug!(path = %path.display(), outcome = ?outcome, "processed statement file");
        on_file(path, &outcome);
    }

    let record_set = build_record_set(selection, &records)?;
    info!(
        files_scanned = files.len(),
        success_count,
        row_count = record_set.height(),
        duration_ms = start.elapsed().as_millis(),
        "consolidation complete"
    );

    Ok(Consolidation {
        record_set,
        success_count,
        files_scanned: files.len(),
        file_issues,
    })
}
