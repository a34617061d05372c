//! Consolidation run: request validation, consolidation, presence check,
//! output.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use camt_model::{ConsolidateRequest, FieldSelection};
use camt_output::{WriteOptions, write_record_set};
use camt_transform::{Consolidation, FileOutcome, consolidate_with};
use camt_validate::{FieldPresence, PresenceReport, presence_report, validate};

/// Everything a finished run reports back.
#[derive(Debug)]
pub struct RunOutcome {
    pub selection: FieldSelection,
    pub consolidation: Consolidation,
    pub presence: FieldPresence,
    pub report: PresenceReport,
    /// Destination actually written, if any.
    pub written: Option<PathBuf>,
    pub dry_run: bool,
}

impl RunOutcome {
    pub fn validation_failed(&self) -> bool {
        !self.presence.ok
    }
}

/// Run one consolidation.
///
/// `on_file` is called after each statement file is processed. A failed
/// presence check is not an error: it is reported in the outcome and output
/// is withheld unless the request allows writing anyway.
pub fn run<F>(request: &ConsolidateRequest, options: WriteOptions, on_file: F) -> Result<RunOutcome>
where
    F: FnMut(&Path, &FileOutcome),
{
    let selection = request
        .validate()
        .context("invalid consolidation request")?;

    let run_span = info_span!(
        "run",
        input_dir = %request.input_dir.display(),
        field_count = selection.len()
    );
    let _run_guard = run_span.enter();
    let start = Instant::now();
    debug!(fields = ?selection.labels(), "resolved field selection");

    let consolidation = consolidate_with(&request.input_dir, &selection, on_file)
        .with_context(|| format!("consolidate {}", request.input_dir.display()))?;

    let presence = validate(&consolidation.record_set, &selection);
    let report = presence_report(&consolidation.record_set, &selection);

    let may_write = presence.ok || request.write_on_validation_failure;
    let mut written = None;
    if !request.dry_run
        && may_write
        && let Some(path) = &request.output_file
    {
        write_record_set(&consolidation.record_set, path, options)
            .with_context(|| format!("write {}", path.display()))?;
        written = Some(path.clone());
    }

    info!(
        rows = consolidation.record_set.height(),
        success_count = consolidation.success_count,
        written = written.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    Ok(RunOutcome {
        selection,
        consolidation,
        presence,
        report,
        written,
        dry_run: request.dry_run,
    })
}
