use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};

use camt_cli::pipeline::{RunOutcome, run};
use camt_ingest::{Scope, resolver};
use camt_model::{ConsolidateRequest, FieldCatalog};
use camt_output::WriteOptions;
use camt_transform::FileOutcome;

use crate::cli::{ConsolidateArgs, FieldsArgs};
use crate::summary::apply_table_style;

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let catalog = FieldCatalog::with_charge_slots(args.catalog.charge_slots);
    let mut table = Table::new();
    table.set_header(vec!["#", "Field", "Read from"]);
    apply_table_style(&mut table);
    for (position, field) in catalog.fields().into_iter().enumerate() {
        let scope = match resolver(field).map(|(scope, _)| scope) {
            Some(Scope::Entry) => "Ntry".to_string(),
            Some(Scope::Transaction) => "TxDtls".to_string(),
            Some(Scope::Charge(index)) => format!("TxDtls/Chrgs/Rcrd[{index}]"),
            None => "-".to_string(),
        };
        table.add_row(vec![
            (position + 1).to_string(),
            field.label().into_owned(),
            scope,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_consolidate(args: &ConsolidateArgs) -> Result<RunOutcome> {
    let request = request_from_args(args);
    let options = WriteOptions::default().with_delimiter(args.delimiter);

    let progress = file_progress();
    let outcome = run(&request, options, |path: &Path, outcome: &FileOutcome| {
        if let Some(name) = path.file_name() {
            progress.set_message(name.to_string_lossy().into_owned());
        }
        if let Some(note) = file_note(path, outcome) {
            progress.println(note);
        }
        progress.inc(1);
    });
    progress.finish_and_clear();
    outcome
}

/// Progress line for a file that added no rows.
fn file_note(path: &Path, outcome: &FileOutcome) -> Option<String> {
    match outcome {
        FileOutcome::Parsed { .. } => None,
        FileOutcome::Empty => Some(format!("no transactions in {}", path.display())),
        FileOutcome::Malformed { .. } => Some(format!("skipped {}", path.display())),
    }
}

fn request_from_args(args: &ConsolidateArgs) -> ConsolidateRequest {
    let catalog = FieldCatalog::with_charge_slots(args.catalog.charge_slots);
    let fields = if args.all_fields {
        catalog
            .fields()
            .into_iter()
            .map(|field| field.label().into_owned())
            .collect()
    } else {
        args.fields.clone()
    };
    ConsolidateRequest {
        input_dir: args.input_dir.clone(),
        output_file: args.output.clone(),
        fields,
        catalog,
        dry_run: args.dry_run,
        write_on_validation_failure: args.force,
    }
}

/// Spinner counting processed files; hidden when stderr is not a terminal.
fn file_progress() -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {pos} files {wide_msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
