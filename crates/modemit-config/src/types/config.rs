use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::common::ModulePackagesPolicy;

/// File name of a build unit's configuration.
pub const CONFIG_FILE: &str = "modemit.config.json";

/// Output directory used when the config does not name one, relative to the unit.
pub const DEFAULT_OUTPUT_DIR: &str = "build/generated";

/// Top-level build-unit configuration (modemit.config.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitConfig {
    /// JSON Schema reference
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Config format version (e.g., "1.0.0")
    pub version: String,

    /// Module descriptor inputs
    pub module: ModuleConfig,

    /// Legacy jar index settings; no index is generated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar_index: Option<JarIndexConfig>,

    /// Output location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Emission settings
    #[serde(default)]
    pub codegen: CodegenConfig,
}

/// Inputs of the synthetic `module-info.class`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Module name, dot separated (e.g., "org.example.core")
    pub name: String,

    /// Module version string, written verbatim
    pub version: String,

    /// Required modules besides the implicit `java.base`
    #[serde(default)]
    pub requires: Vec<String>,

    /// Packages owned by the module, '/' separated
    #[serde(default)]
    pub packages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JarIndexConfig {
    /// File name of the jar the index describes
    pub jar_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, relative to the unit directory unless absolute
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenConfig {
    #[serde(default)]
    pub module_packages: ModulePackagesPolicy,
}

impl UnitConfig {
    /// Resolve the output directory against the unit root.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        match &self.output {
            Some(out) if out.dir.is_absolute() => out.dir.clone(),
            Some(out) => root.join(&out.dir),
            None => root.join(DEFAULT_OUTPUT_DIR),
        }
    }
}
