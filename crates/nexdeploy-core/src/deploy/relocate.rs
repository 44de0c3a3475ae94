//! Post-deploy relocation of generated `.js` files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::{has_extension, same_path};
use crate::{Error, Result};

/// Extension of the files `nexacroDeployExecute` generates next to a source.
pub const ARTIFACT_EXTENSIONS: &[&str] = &[".js"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationReport {
    pub moved: Vec<PathBuf>,
}

/// Move every `.js` file beside `source_file` into `target_dir`.
///
/// A missing source directory is a no-op. Existing destinations are
/// overwritten. The first failing move aborts with [`Error::Relocate`].
pub fn relocate_artifacts(source_file: &Path, target_dir: &Path) -> Result<RelocationReport> {
    let mut report = RelocationReport::default();

    let Some(src_dir) = source_file.parent() else {
        tracing::warn!(file = %source_file.display(), "Source file has no parent directory");
        return Ok(report);
    };
    if !src_dir.is_dir() {
        tracing::warn!(dir = %src_dir.display(), "Source directory does not exist");
        return Ok(report);
    }

    fs::create_dir_all(target_dir).map_err(|e| Error::io(target_dir, e))?;

    let mut artifacts = Vec::new();
    for entry in fs::read_dir(src_dir).map_err(|e| Error::io(src_dir, e))? {
        let path = entry.map_err(|e| Error::io(src_dir, e))?.path();
        if has_extension(&path, ARTIFACT_EXTENSIONS) && path.is_file() {
            artifacts.push(path);
        }
    }
    artifacts.sort();

    for src in artifacts {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dest = target_dir.join(name);
        if same_path(&src, &dest) {
            continue;
        }
        move_file(&src, &dest).map_err(|source| Error::Relocate {
            from: src.clone(),
            to: dest.clone(),
            source,
        })?;
        tracing::debug!(from = %src.display(), to = %dest.display(), "Moved artifact");
        report.moved.push(dest);
    }

    Ok(report)
}

/// Rename `src` onto `dest`, replacing it; copies across devices.
fn move_file(src: &Path, dest: &Path) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    if dest.exists() {
        fs::remove_file(dest)?;
    }

    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if is_cross_device_os_error(&err) => {
            fs::copy(src, dest)?;
            fs::remove_file(src)
        }
        Err(err) => Err(err),
    }
}

fn is_cross_device_os_error(err: &std::io::Error) -> bool {
    let Some(code) = err.raw_os_error() else {
        return false;
    };

    #[cfg(unix)]
    {
        const EXDEV: i32 = 18;
        code == EXDEV
    }

    #[cfg(windows)]
    {
        const ERROR_NOT_SAME_DEVICE: i32 = 17;
        code == ERROR_NOT_SAME_DEVICE
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = code;
        false
    }
}
