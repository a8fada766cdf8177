use indexmap::IndexMap;

use crate::loader::LoadedUnit;
use crate::types::common::JAVA_BASE;
use crate::types::config::CONFIG_FILE;
use crate::types::error::{ErrorEntry, ValidationReport, E_DUPLICATE_ENTRY, W_EXPLICIT_JAVA_BASE};

/// Check for repeated requires/packages and a redundant `java.base` require.
///
/// The emitters write whatever they are given, so a repeated name would end
/// up twice in the descriptor.
pub fn check(unit: &LoadedUnit, report: &mut ValidationReport) {
    let module = &unit.config.module;

    check_list(&module.requires, "requires", "Required module", report);
    check_list(&module.packages, "packages", "Package", report);

    for (i, name) in module.requires.iter().enumerate() {
        if name == JAVA_BASE {
            report.push(
                ErrorEntry::warning(
                    W_EXPLICIT_JAVA_BASE,
                    "'java.base' is always required implicitly",
                    CONFIG_FILE,
                    &format!("$.module.requires[{i}]"),
                )
                .with_suggestion("Remove 'java.base' from 'requires'"),
            );
        }
    }
}

fn check_list(values: &[String], field: &str, label: &str, report: &mut ValidationReport) {
    let mut first_seen: IndexMap<&str, usize> = IndexMap::new();

    for (i, value) in values.iter().enumerate() {
        if let Some(first) = first_seen.get(value.as_str()) {
            report.push(
                ErrorEntry::error(
                    E_DUPLICATE_ENTRY,
                    format!("{label} '{value}' is already declared at index {first}"),
                    CONFIG_FILE,
                    &format!("$.module.{field}[{i}]"),
                )
                .with_suggestion(format!("Remove the duplicate entry from '{field}'")),
            );
        } else {
            first_seen.insert(value.as_str(), i);
        }
    }
}
