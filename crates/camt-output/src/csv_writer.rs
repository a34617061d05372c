//! Delimited text output.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use tempfile::NamedTempFile;

use camt_transform::RecordSet;

use crate::error::{OutputError, Result};

/// Byte order mark written ahead of the header row.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for [`write_record_set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl WriteOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Write a record set as BOM-prefixed UTF-8 delimited text.
///
/// The header row holds the column labels; nulls are written as empty
/// fields. Content goes to a temporary file next to `path` which replaces
/// `path` only once fully written.
pub fn write_record_set(record_set: &RecordSet, path: &Path, options: WriteOptions) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::EmptyPath);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| OutputError::Io {
        operation: "create directory",
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| OutputError::Io {
        operation: "create temporary file in",
        path: dir.to_path_buf(),
        source: e,
    })?;

    temp.write_all(UTF8_BOM).map_err(|e| OutputError::Io {
        operation: "write",
        path: temp.path().to_path_buf(),
        source: e,
    })?;

    {
        let mut writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(temp.as_file_mut());

        writer.write_record(record_set.column_labels())?;

        let columns: Vec<Vec<Option<&str>>> = record_set
            .fields()
            .iter()
            .map(|field| record_set.column_values(*field))
            .collect();
        for row in 0..record_set.height() {
            let cells = columns
                .iter()
                .map(|values| values.get(row).copied().flatten().unwrap_or(""));
            writer.write_record(cells)?;
        }
        writer.flush().map_err(|e| OutputError::Io {
            operation: "flush",
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    temp.as_file().sync_all().map_err(|e| OutputError::Io {
        operation: "sync",
        path: temp.path().to_path_buf(),
        source: e,
    })?;

    // Dropping the returned temporary file on failure removes it.
    temp.persist(path).map_err(|e| OutputError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    tracing::info!(
        path = %path.display(),
        rows = record_set.height(),
        columns = record_set.width(),
        "wrote record set"
    );
    Ok(())
}
