use crate::loader::LoadedUnit;
use crate::rules;
use crate::types::error::ValidationReport;

/// Validate a loaded build unit.
/// Runs all validation rules and returns a consolidated report.
pub fn validate(unit: &LoadedUnit) -> ValidationReport {
    let mut report = ValidationReport::success();

    rules::required_fields::check(unit, &mut report);
    rules::capacity::check(unit, &mut report);
    rules::duplicates::check(unit, &mut report);
    rules::package_paths::check(unit, &mut report);

    tracing::debug!(
        module = %unit.config.module.name,
        entries = report.errors.len(),
        ok = report.ok,
        "validated build unit"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_config;
    use crate::types::common::Severity;
    use std::path::PathBuf;

    fn unit(json: &str) -> LoadedUnit {
        LoadedUnit {
            root: PathBuf::from("/unit"),
            config: parse_config(json, "modemit.config.json").unwrap(),
        }
    }

    #[test]
    fn test_valid_unit_has_clean_report() {
        let report = validate(&unit(
            r#"{
                "version": "1.0.0",
                "module": {
                    "name": "org.example.core",
                    "version": "1.0.0",
                    "requires": ["org.example.api"],
                    "packages": ["org/example/core", "org/example/core/internal"]
                },
                "jarIndex": { "jarName": "core.jar" }
            }"#,
        ));
        assert!(report.ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_rules_accumulate() {
        let report = validate(&unit(
            r#"{
                "version": "1.0.0",
                "module": {
                    "name": "",
                    "version": "1.0.0",
                    "requires": ["java.base"],
                    "packages": ["a/b", "a/b", "a//c"]
                }
            }"#,
        ));
        assert!(!report.ok);
        assert_eq!(report.count(Severity::Error), 2);
        assert_eq!(report.count(Severity::Warning), 2);
    }
}
