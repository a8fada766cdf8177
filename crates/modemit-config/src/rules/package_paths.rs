use crate::loader::LoadedUnit;
use crate::types::config::CONFIG_FILE;
use crate::types::error::{ErrorEntry, ValidationReport, W_INVALID_PACKAGE_PATH};

/// Flag package paths that are not '/'-separated segment sequences.
pub fn check(unit: &LoadedUnit, report: &mut ValidationReport) {
    for (i, package) in unit.config.module.packages.iter().enumerate() {
        if let Some(reason) = path_problem(package) {
            report.push(
                ErrorEntry::warning(
                    W_INVALID_PACKAGE_PATH,
                    format!("Package path '{package}' {reason}"),
                    CONFIG_FILE,
                    &format!("$.module.packages[{i}]"),
                )
                .with_suggestion("Use '/' separated segments, e.g. 'org/example/core'"),
            );
        }
    }
}

fn path_problem(package: &str) -> Option<&'static str> {
    if package.is_empty() {
        Some("is empty")
    } else if package.contains('.') {
        Some("uses '.' instead of '/' as separator")
    } else if package.split('/').any(str::is_empty) {
        Some("contains an empty segment")
    } else {
        None
    }
}
