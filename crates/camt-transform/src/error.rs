//! Error types for batch consolidation.

use thiserror::Error;

use camt_ingest::IngestError;

/// Errors that abort a consolidation run.
///
/// Per-file problems are not errors; they are reported through
/// [`crate::FileIssue`] and the batch continues.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input directory could not be listed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The record set could not be assembled.
    #[error("failed to build record set: {0}")]
    Frame(#[from] polars::error::PolarsError),
}

/// Result type for consolidation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
