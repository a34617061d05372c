//! CLI argument definitions for the CAMT.054 consolidator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use camt_model::DEFAULT_CHARGE_SLOTS;

#[derive(Parser)]
#[command(
    name = "camt054",
    version,
    about = "CAMT.054 consolidator - Flatten bank notifications into one table",
    long_about = "Consolidate a directory of ISO 20022 CAMT.054 (v04) debit/credit \
                  notifications into a single delimited file.\n\n\
                  Each transaction detail becomes one row; columns are the selected \
                  fields in catalog order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Consolidate every *.xml file of a directory into one delimited file.
    Consolidate(ConsolidateArgs),

    /// List the selectable fields in column order.
    Fields(FieldsArgs),
}

#[derive(Parser)]
pub struct ConsolidateArgs {
    /// Directory containing the notification files (not searched recursively).
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Destination file.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Field to include, by catalog name (repeatable).
    #[arg(short = 'f', long = "field", value_name = "NAME")]
    pub fields: Vec<String>,

    /// Include every catalog field.
    #[arg(long = "all-fields", conflicts_with = "fields")]
    pub all_fields: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Field delimiter (single ASCII character, or "tab").
    #[arg(long = "delimiter", value_name = "C", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Write the output even if a selected field has no value in any row.
    #[arg(long = "force")]
    pub force: bool,

    /// Consolidate and validate without writing output.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Number of charge records exposed as Charge N fields.
    #[arg(
        long = "charge-slots",
        value_name = "N",
        default_value_t = DEFAULT_CHARGE_SLOTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub charge_slots: u32,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    if value.eq_ignore_ascii_case("tab") || value == "\\t" {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' => Ok(*byte),
        _ => Err(format!(
            "expected a single ASCII character other than a quote or newline, got '{value}'"
        )),
    }
}
