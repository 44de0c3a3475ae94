//! Token to deploy-target resolution.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::paths::{normalized_token, resolve_token};
use crate::{Error, Result};

/// Normalized token → one target per base, in base order.
pub type TargetMap = IndexMap<String, Vec<PathBuf>>;

/// Combines output bases with tokens.
///
/// Pure path arithmetic: the filesystem is never consulted, so equal inputs
/// always give equal maps.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    bases: Vec<PathBuf>,
}

impl TargetResolver {
    /// `bases` must hold at least the primary output base.
    pub fn new(bases: Vec<PathBuf>) -> Result<Self> {
        if bases.is_empty() {
            return Err(Error::config("at least one output base (-O) is required"));
        }
        Ok(Self { bases })
    }

    pub fn bases(&self) -> &[PathBuf] {
        &self.bases
    }

    /// Resolve every distinct token, keeping first-seen order.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> TargetMap {
        let mut targets = TargetMap::new();
        for token in tokens {
            let token = token.as_ref();
            let key = normalized_token(token);
            if targets.contains_key(&key) {
                continue;
            }
            let resolved: Vec<PathBuf> = self
                .bases
                .iter()
                .map(|base| resolve_token(base, token))
                .collect();
            tracing::debug!(token, key = %key, "Resolved deploy targets");
            targets.insert(key, resolved);
        }
        targets
    }
}
