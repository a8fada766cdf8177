use serde::{Deserialize, Serialize};

use super::common::Severity;

// ── Error code constants ──

pub const E_PARSE_ERROR: &str = "E_PARSE_ERROR";
pub const E_MISSING_FIELD: &str = "E_MISSING_FIELD";
pub const E_CAPACITY_EXCEEDED: &str = "E_CAPACITY_EXCEEDED";
pub const E_DUPLICATE_ENTRY: &str = "E_DUPLICATE_ENTRY";
pub const W_INVALID_PACKAGE_PATH: &str = "W_INVALID_PACKAGE_PATH";
pub const W_EXPLICIT_JAVA_BASE: &str = "W_EXPLICIT_JAVA_BASE";

/// A single validation/parsing error entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Machine-readable stable error code
    pub code: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable error message
    pub message: String,
    /// Relative file path where the error occurred
    pub file: String,
    /// JSONPath to the offending field
    pub path: String,
    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Aggregated validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the unit is valid (no errors, warnings are ok)
    pub ok: bool,
    /// All collected errors, warnings, and info entries
    pub errors: Vec<ErrorEntry>,
}

impl ValidationReport {
    /// Create a successful (empty) report
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    /// Add an error entry and update the ok flag
    pub fn push(&mut self, entry: ErrorEntry) {
        if entry.severity == Severity::Error {
            self.ok = false;
        }
        self.errors.push(entry);
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for entry in other.errors {
            self.push(entry);
        }
    }

    /// Count entries of a specific severity
    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }
}

impl ErrorEntry {
    /// Create a new error entry
    pub fn error(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self::new(code, Severity::Error, message, file, path)
    }

    /// Create a warning entry
    pub fn warning(code: &str, message: impl Into<String>, file: &str, path: &str) -> Self {
        Self::new(code, Severity::Warning, message, file, path)
    }

    fn new(
        code: &str,
        severity: Severity,
        message: impl Into<String>,
        file: &str,
        path: &str,
    ) -> Self {
        Self {
            code: code.to_string(),
            severity,
            message: message.into(),
            file: file.to_string(),
            path: path.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion to this entry
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
