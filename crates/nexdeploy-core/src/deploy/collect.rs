//! Source file collection for per-file deploys.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::paths::{has_extension, normalized_token, resolve_token};
use crate::{Error, Result};

/// Extensions `nexacroDeployExecute` accepts with `-FILE`.
pub const DEPLOYABLE_EXTENSIONS: &[&str] = &[".xfdl", ".xjs"];

/// Normalized token → sorted source files. Tokens without files are absent.
pub type FileMap = IndexMap<String, Vec<PathBuf>>;

/// Collects deployable files under the source base for each token.
#[derive(Debug, Clone)]
pub struct FileCollector {
    source_base: PathBuf,
    extensions: Vec<String>,
}

impl FileCollector {
    /// Collector for `.xfdl` and `.xjs` files.
    pub fn new(source_base: PathBuf) -> Self {
        Self {
            source_base,
            extensions: DEPLOYABLE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the allowed extension set (each entry like `.xfdl`).
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions.iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    pub fn source_base(&self) -> &Path {
        &self.source_base
    }

    /// Collect the files for every distinct token.
    ///
    /// A token whose path does not exist is logged and skipped. A directory
    /// contributes its direct children only.
    pub fn collect<S: AsRef<str>>(&self, tokens: &[S]) -> Result<FileMap> {
        let mut files = FileMap::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for token in tokens {
            let token = token.as_ref();
            let key = normalized_token(token);
            if !seen.insert(key.clone()) {
                continue;
            }

            let target = resolve_token(&self.source_base, token);
            if !target.exists() {
                tracing::warn!(path = %target.display(), "Path does not exist, skipping");
                continue;
            }

            let collected = self.collect_target(&target)?;
            if collected.is_empty() {
                tracing::debug!(path = %target.display(), "No deployable files");
                continue;
            }
            files.insert(key, collected.into_iter().collect());
        }

        Ok(files)
    }

    fn collect_target(&self, target: &Path) -> Result<BTreeSet<PathBuf>> {
        let mut collected = BTreeSet::new();

        if target.is_file() {
            if has_extension(target, &self.extensions) {
                collected.insert(target.to_path_buf());
            }
            return Ok(collected);
        }

        let entries = fs::read_dir(target).map_err(|e| Error::io(target, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(target, e))?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, &self.extensions) {
                collected.insert(path);
            }
        }
        Ok(collected)
    }
}
