use modemit_config::types::common::is_internal_package;
use modemit_config::types::config::ModuleConfig;

/// Fully resolved inputs of a synthetic `module-info.class`.
///
/// `java.base` is required implicitly and must not appear in `requires`.
/// Duplicates are not checked here; see the validation rules in
/// `modemit_config::rules::duplicates`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub version: String,
    pub requires: Vec<String>,
    /// '/'-separated package paths
    pub packages: Vec<String>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.extend(packages.into_iter().map(Into::into));
        self
    }

    /// Number of caller-supplied constant-pool pairs.
    pub fn declared_entries(&self) -> usize {
        self.requires.len() + self.packages.len()
    }

    /// Packages that appear in the `Module` attribute's exports.
    pub fn exported_packages(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .map(String::as_str)
            .filter(|p| !is_internal_package(p))
    }
}

impl From<&ModuleConfig> for ModuleDescriptor {
    fn from(config: &ModuleConfig) -> Self {
        Self {
            name: config.name.clone(),
            version: config.version.clone(),
            requires: config.requires.clone(),
            packages: config.packages.clone(),
        }
    }
}
