use modemit_config::types::config::UnitConfig;

use crate::error::CodegenError;

/// An emitter that turns a build-unit configuration into one artifact.
///
/// Implementations are pure: the same config always yields the same bytes.
pub trait ArtifactEmitter {
    /// Short name used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Path of the artifact relative to the unit's output directory.
    fn artifact_path(&self) -> &'static str;

    /// Produce the artifact bytes, or `None` when the config does not ask
    /// for this artifact.
    fn emit_artifact(&self, config: &UnitConfig) -> Result<Option<Vec<u8>>, CodegenError>;
}
