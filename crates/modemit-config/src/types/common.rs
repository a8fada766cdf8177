use serde::{Deserialize, Serialize};

/// Upper bound on `requires.len() + packages.len()` for a single module
/// descriptor. Keeps every constant-pool index below 256.
pub const MAX_DECLARED_ENTRIES: usize = 123;

/// Module every descriptor depends on without declaring it.
pub const JAVA_BASE: &str = "java.base";

/// Last path segment that hides a package from the module's exports.
pub const INTERNAL_SEGMENT: &str = "internal";

/// Error/warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// When the `ModulePackages` attribute is written into `module-info.class`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModulePackagesPolicy {
    /// Only when at least one package is hidden from the exports. Without
    /// hidden packages the exports already list every package.
    #[default]
    WhenHidden,
    /// Whenever the module declares at least one package.
    Always,
}

/// Whether a '/'-separated package path is hidden from the exports.
pub fn is_internal_package(path: &str) -> bool {
    path.rsplit('/').next() == Some(INTERNAL_SEGMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_value(Severity::Error).unwrap(), "error");
        assert_eq!(
            serde_json::to_value(Severity::Warning).unwrap(),
            "warning"
        );
    }

    #[test]
    fn test_policy_serialization() {
        assert_eq!(
            serde_json::to_value(ModulePackagesPolicy::WhenHidden).unwrap(),
            "whenHidden"
        );
        let policy: ModulePackagesPolicy = serde_json::from_str("\"always\"").unwrap();
        assert_eq!(policy, ModulePackagesPolicy::Always);
        assert_eq!(ModulePackagesPolicy::default(), ModulePackagesPolicy::WhenHidden);
    }

    #[test]
    fn test_internal_package_detection() {
        assert!(is_internal_package("a/b/internal"));
        assert!(is_internal_package("internal"));
        assert!(!is_internal_package("a/internal/b"));
        assert!(!is_internal_package("a/b/internals"));
        assert!(!is_internal_package("a/b/myinternal"));
    }
}
