//! Direct file count of a directory, written as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::absolutize;
use crate::{Error, Result};

/// Default report file name.
pub const FILE_COUNT_FILE_NAME: &str = "file_count.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCountReport {
    /// Absolute directory path
    pub path: String,
    /// Regular files directly inside the directory
    pub file_count: usize,
}

/// Count the regular files directly inside `dir`.
pub fn count_files(dir: &Path) -> Result<FileCountReport> {
    let abs = absolutize(dir).map_err(|e| Error::io(dir, e))?;
    let mut file_count = 0;
    for entry in fs::read_dir(&abs).map_err(|e| Error::io(&abs, e))? {
        let entry = entry.map_err(|e| Error::io(&abs, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| Error::io(entry.path(), e))?
            .is_file();
        if is_file {
            file_count += 1;
        }
    }

    Ok(FileCountReport {
        path: abs.to_string_lossy().into_owned(),
        file_count,
    })
}

/// Count `dir` and write the report as pretty JSON to `output`.
pub fn write_file_count(dir: &Path, output: &Path) -> Result<FileCountReport> {
    let report = count_files(dir)?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| Error::io(output, std::io::Error::other(e)))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(output, json).map_err(|e| Error::io(output, e))?;
    tracing::info!(path = %output.display(), count = report.file_count, "Wrote file count");
    Ok(report)
}

/// Directory a `-F` value names: its parent when it is a file or an `.xml` path.
pub fn search_base_dir(value: &Path) -> PathBuf {
    let is_xml = value
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
    if value.is_file() || is_xml {
        value
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        value.to_path_buf()
    }
}
