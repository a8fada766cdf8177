use crate::loader::LoadedUnit;
use crate::types::common::MAX_DECLARED_ENTRIES;
use crate::types::config::CONFIG_FILE;
use crate::types::error::{ErrorEntry, ValidationReport, E_CAPACITY_EXCEEDED};

/// Check that the descriptor fits in the emitter's constant-pool budget.
pub fn check(unit: &LoadedUnit, report: &mut ValidationReport) {
    let module = &unit.config.module;
    let declared = module.requires.len() + module.packages.len();

    if declared > MAX_DECLARED_ENTRIES {
        report.push(
            ErrorEntry::error(
                E_CAPACITY_EXCEEDED,
                format!(
                    "Module declares {} requires and {} packages ({declared} total); at most {MAX_DECLARED_ENTRIES} are supported",
                    module.requires.len(),
                    module.packages.len(),
                ),
                CONFIG_FILE,
                "$.module",
            )
            .with_suggestion("Split the module or drop unneeded requires/packages"),
        );
    }
}
