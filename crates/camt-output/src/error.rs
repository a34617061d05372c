//! Error types for output writing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing a record set.
///
/// On any error the destination file is left as it was.
#[derive(Debug, Error)]
pub enum OutputError {
    /// No destination path was given.
    #[error("output path is empty")]
    EmptyPath,

    /// I/O error while preparing or writing the temporary file.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization error.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The finished temporary file could not replace the destination.
    #[error("failed to move output into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
