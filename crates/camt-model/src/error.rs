//! Error types for field selection and run configuration.

use thiserror::Error;

/// Precondition violations detected before any file is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No field was selected.
    #[error("no fields selected: select at least one field to extract")]
    EmptySelection,

    /// A field name is not part of the catalog.
    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    /// The input directory was left empty.
    #[error("no input directory specified")]
    MissingInputDirectory,

    /// The output file was left empty.
    #[error("no output file specified")]
    MissingOutputFile,
}

pub type Result<T> = std::result::Result<T, ModelError>;
