use std::path::{Path, PathBuf};

use crate::parser;
use crate::types::config::{UnitConfig, CONFIG_FILE};
use crate::types::error::ErrorEntry;

/// A loaded build unit with its parsed configuration
#[derive(Debug, Clone)]
pub struct LoadedUnit {
    /// Unit root directory
    pub root: PathBuf,
    /// Parsed unit config
    pub config: UnitConfig,
}

impl LoadedUnit {
    /// Directory the unit's artifacts are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir(&self.root)
    }
}

/// Load and parse a build-unit directory.
///
/// Only parsing happens here; validation rules run separately through
/// [`crate::validator::validate`].
#[allow(clippy::result_large_err)]
pub fn load_unit(unit_dir: &Path) -> Result<LoadedUnit, LoadError> {
    if !unit_dir.is_dir() {
        return Err(LoadError::UnitNotFound(
            unit_dir.to_string_lossy().into_owned(),
        ));
    }

    let config_path = unit_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Err(LoadError::ConfigNotFound(
            config_path.to_string_lossy().into_owned(),
        ));
    }

    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| LoadError::IoError(config_path.to_string_lossy().into_owned(), e))?;

    let config = parser::parse_config(&content, CONFIG_FILE).map_err(LoadError::ConfigParseError)?;

    tracing::debug!(
        unit = %unit_dir.display(),
        module = %config.module.name,
        "loaded build unit"
    );

    Ok(LoadedUnit {
        root: unit_dir.to_path_buf(),
        config,
    })
}

/// Errors that prevent unit loading entirely
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Build unit directory not found: {0}")]
    UnitNotFound(String),

    #[error("modemit.config.json not found: {0}")]
    ConfigNotFound(String),

    #[error("Failed to parse modemit.config.json: {}", .0.message)]
    ConfigParseError(ErrorEntry),

    #[error("I/O error reading {0}: {1}")]
    IoError(String, std::io::Error),
}
