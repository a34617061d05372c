//! Explicit parameters for one consolidation run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::FieldCatalog;
use crate::selection::FieldSelection;

/// Everything a consolidation run needs, gathered by the caller up front.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsolidateRequest {
    /// Directory scanned (non-recursively) for `*.xml` files.
    pub input_dir: PathBuf,
    /// Destination of the delimited output. May be omitted for dry runs.
    pub output_file: Option<PathBuf>,
    /// Requested field labels, in any order.
    pub fields: Vec<String>,
    /// Catalog used to resolve `fields`.
    #[serde(default)]
    pub catalog: FieldCatalog,
    /// Consolidate and validate without writing output.
    #[serde(default)]
    pub dry_run: bool,
    /// Write output even when a selected field has no value anywhere.
    #[serde(default)]
    pub write_on_validation_failure: bool,
}

impl ConsolidateRequest {
    /// Check preconditions and resolve the field selection.
    ///
    /// Performs no I/O.
    pub fn validate(&self) -> Result<FieldSelection> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(ModelError::MissingInputDirectory);
        }
        if !self.dry_run {
            let missing = self
                .output_file
                .as_ref()
                .is_none_or(|path| path.as_os_str().is_empty());
            if missing {
                return Err(ModelError::MissingOutputFile);
            }
        }
        FieldSelection::parse(&self.catalog, &self.fields)
    }
}
