pub mod capacity;
pub mod duplicates;
pub mod package_paths;
pub mod required_fields;
