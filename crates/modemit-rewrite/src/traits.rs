use std::path::{Path, PathBuf};

use crate::error::RewriteError;

/// A transform over a directory tree of compiled classes.
pub trait ClassTransform {
    /// Short name used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Read classes under `input` and write the results under `output`.
    fn transform(&self, input: &Path, output: &Path) -> Result<TransformReport, RewriteError>;
}

/// What a transform did, in the order classes were visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub renamed: Vec<RenamedClass>,
    /// Output paths of classes written back unchanged
    pub copied: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedClass {
    /// Internal name before the rename
    pub from: String,
    /// Internal name after the rename
    pub to: String,
    pub output: PathBuf,
}

impl TransformReport {
    pub fn total(&self) -> usize {
        self.renamed.len() + self.copied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
