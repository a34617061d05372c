//! Output writer for consolidated record sets.
//!
//! Writes spreadsheet-friendly delimited text: UTF-8 with a byte order mark,
//! a header row of field labels, and empty cells for missing values. Writes
//! are all-or-nothing.

mod csv_writer;
mod error;

pub use csv_writer::{UTF8_BOM, WriteOptions, write_record_set};
pub use error::{OutputError, Result};
