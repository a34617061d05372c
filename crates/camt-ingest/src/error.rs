//! Error types for CAMT.054 ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// A document that is not well-formed XML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {position})")]
pub struct XmlSyntaxError {
    pub message: String,
    pub position: u64,
}

impl XmlSyntaxError {
    pub fn new(message: impl Into<String>, position: u64) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Errors that can occur while discovering and reading statement files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Document Errors ===
    /// The file is not well-formed XML.
    #[error("failed to parse {path}: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: XmlSyntaxError,
    },
}

impl IngestError {
    /// Whether the error concerns a single file and the batch may continue.
    #[must_use]
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::MalformedDocument { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
