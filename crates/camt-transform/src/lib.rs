//! CAMT.054 batch consolidation crate.
//!
//! Turns a directory of notification files into a single [`RecordSet`]:
//! one column per selected field, in catalog order, and one row per
//! transaction detail across all files.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use camt_model::{FieldCatalog, FieldSelection};
//! use camt_transform::consolidate;
//!
//! let selection = FieldSelection::parse(&FieldCatalog::default(), ["Booking Date"])?;
//! let consolidation = consolidate(Path::new("statements"), &selection)?;
//! println!("{} rows from {} files", consolidation.record_set.height(), consolidation.success_count);
//! ```
//!
//! Malformed files are skipped and listed in [`Consolidation::file_issues`];
//! only a directory that cannot be listed aborts the run.

mod consolidate;
mod error;
mod frame;
mod frame_builder;

// Error type
pub use error::{Result, TransformError};

// Record set
pub use frame::RecordSet;
pub use frame_builder::build_record_set;

// Consolidation
pub use consolidate::{Consolidation, FileIssue, FileOutcome, consolidate, consolidate_with};
