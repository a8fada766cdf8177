use std::path::PathBuf;

use modemit_codegen::{ClassParseError, CodegenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse class {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ClassParseError,
    },

    #[error("class {path} renames to '{name}', which is outside the output directory")]
    OutputEscapesRoot { path: PathBuf, name: String },

    #[error("output directory {output} is inside the input directory {input}")]
    OutputInsideInput { input: PathBuf, output: PathBuf },

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl RewriteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
