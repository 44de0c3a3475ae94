//! Best-effort removal of deploy output in test mode.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Recursively delete each existing directory.
///
/// Failures are logged and do not stop the remaining removals.
pub fn cleanup_dirs<P: AsRef<Path>>(dirs: &[P]) -> CleanupReport {
    let mut report = CleanupReport::default();
    tracing::info!(count = dirs.len(), "Cleaning up test output");

    for dir in dirs {
        let dir = dir.as_ref();
        if !dir.exists() {
            continue;
        }
        match std::fs::remove_dir_all(dir) {
            Ok(()) => {
                tracing::info!(dir = %dir.display(), "Removed");
                report.removed.push(dir.to_path_buf());
            }
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Failed to remove");
                report.failed.push(dir.to_path_buf());
            }
        }
    }

    report
}

/// Removal order for test mode: every target, then secondary and primary
/// bases, without repeats.
pub fn cleanup_order<'a, I>(
    targets: I,
    secondary: Option<&'a Path>,
    primary: &'a Path,
) -> Vec<PathBuf>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let mut order: Vec<PathBuf> = Vec::new();
    let candidates = targets
        .into_iter()
        .map(PathBuf::as_path)
        .chain(secondary)
        .chain(std::iter::once(primary));
    for dir in candidates {
        if !order.iter().any(|d| d == dir) {
            order.push(dir.to_path_buf());
        }
    }
    order
}
