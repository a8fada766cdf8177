pub mod loader;
pub mod parser;
pub mod rules;
pub mod types;
pub mod validator;

// Re-exports
pub use loader::{load_unit, LoadError, LoadedUnit};
pub use types::common::{ModulePackagesPolicy, Severity, MAX_DECLARED_ENTRIES};
pub use types::config::UnitConfig;
pub use types::error::{ErrorEntry, ValidationReport};
pub use validator::validate;
