//! Statement file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// File name suffix of statement files.
pub const XML_SUFFIX: &str = ".xml";

/// Lists all XML files directly inside a directory.
///
/// Only regular files whose name ends in `.xml` are returned; subdirectories
/// are not descended into. Returns files sorted by filename.
pub fn list_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let is_xml = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(XML_SUFFIX));

        if is_xml {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}
