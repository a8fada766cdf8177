pub mod attribute;
pub mod bytes;
pub mod classfile;
pub mod constant_pool;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod traits;

// Artifact emitters
pub mod emitters;

// Re-exports
pub use classfile::{parse_header, parse_module_info, ClassParseError, ModuleInfo, Requires};
pub use descriptor::ModuleDescriptor;
pub use emitters::jar_index::{emit_jar_index, JarIndexEmitter};
pub use emitters::module_info::ModuleInfoEmitter;
pub use error::CodegenError;
pub use generator::{write_atomic, CodeGenerator, GeneratedArtifacts};
pub use traits::ArtifactEmitter;
