//! CAMT.054 ingestion utilities.
//!
//! This crate discovers notification files in a directory, parses them into a
//! read-only element tree, and flattens their transaction details into
//! [`camt_model::Record`]s.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use camt_ingest::{extract_file, list_xml_files};
//! use camt_model::{FieldCatalog, FieldSelection};
//!
//! let selection = FieldSelection::parse(&FieldCatalog::default(), ["Booking Date"])?;
//! for path in list_xml_files(Path::new("statements"))? {
//!     let records = extract_file(&path, &selection)?;
//! }
//! ```

mod discovery;
mod document;
mod error;
mod extract;

// === Error Types ===
pub use error::{IngestError, Result, XmlSyntaxError};

// === File Discovery ===
pub use discovery::{XML_SUFFIX, list_xml_files};

// === Documents ===
pub use document::{CAMT054_NAMESPACE, CamtDocument, Descendants, Element};

// === Extraction ===
pub use extract::{EntryExtractor, Lookup, Scope, extract, extract_file, resolver};
