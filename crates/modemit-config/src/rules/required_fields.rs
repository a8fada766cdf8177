use crate::loader::LoadedUnit;
use crate::types::config::CONFIG_FILE;
use crate::types::error::{ErrorEntry, ValidationReport, E_MISSING_FIELD};

/// Check that required fields are present and non-empty.
pub fn check(unit: &LoadedUnit, report: &mut ValidationReport) {
    let config = &unit.config;

    if config.module.name.is_empty() {
        report.push(
            ErrorEntry::error(
                E_MISSING_FIELD,
                "Module name is required",
                CONFIG_FILE,
                "$.module.name",
            )
            .with_suggestion("Add a 'name' field (e.g., 'org.example.core') to 'module'"),
        );
    }

    if config.module.version.is_empty() {
        report.push(
            ErrorEntry::error(
                E_MISSING_FIELD,
                "Module version is required",
                CONFIG_FILE,
                "$.module.version",
            )
            .with_suggestion("Add a 'version' field (e.g., '1.0.0') to 'module'"),
        );
    }

    if let Some(index) = &config.jar_index {
        if index.jar_name.is_empty() {
            report.push(
                ErrorEntry::error(
                    E_MISSING_FIELD,
                    "Jar name is required when 'jarIndex' is present",
                    CONFIG_FILE,
                    "$.jarIndex.jarName",
                )
                .with_suggestion("Set 'jarName' to the archive file name, or remove 'jarIndex'"),
            );
        }
    }
}
