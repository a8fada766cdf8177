use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use modemit_config::types::common::ModulePackagesPolicy;
use modemit_config::types::config::UnitConfig;

use crate::emitters;
use crate::error::CodegenError;
use crate::traits::ArtifactEmitter;

/// Write `bytes` to `path` so that `path` either keeps its previous state or
/// holds the full contents. The bytes go to a temporary file in the same
/// directory, are flushed and synced, then renamed into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CodegenError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}

/// A collection of generated artifacts, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct GeneratedArtifacts {
    /// Sorted for deterministic output
    files: BTreeMap<String, Vec<u8>>,
}

impl GeneratedArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn files(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Write every artifact under `output_dir`, each one atomically.
    pub fn write_to_disk(&self, output_dir: &Path) -> Result<(), CodegenError> {
        for (rel_path, content) in &self.files {
            write_atomic(&output_dir.join(rel_path), content)?;
        }
        Ok(())
    }
}

/// Runs every artifact emitter of a build unit.
pub struct CodeGenerator {
    emitters: Vec<Box<dyn ArtifactEmitter>>,
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field(
                "emitters",
                &self.emitters.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CodeGenerator {
    pub fn new(policy: ModulePackagesPolicy) -> Self {
        Self {
            emitters: emitters::create_emitters(policy),
        }
    }

    /// Generator configured from the unit's `codegen` section.
    pub fn for_unit(config: &UnitConfig) -> Self {
        Self::new(config.codegen.module_packages)
    }

    /// Produce every artifact for `config`. Nothing touches the disk here, so
    /// a failing emitter leaves no output behind.
    pub fn generate(&self, config: &UnitConfig) -> Result<GeneratedArtifacts, CodegenError> {
        let mut output = GeneratedArtifacts::new();
        for emitter in &self.emitters {
            match emitter.emit_artifact(config)? {
                Some(bytes) => output.add_file(emitter.artifact_path(), bytes),
                None => tracing::debug!(emitter = emitter.name(), "artifact not configured"),
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: serde_json::Value) -> UnitConfig {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_generated_artifacts_basics() {
        let mut artifacts = GeneratedArtifacts::new();
        artifacts.add_file("module/module-info.class", vec![0xCAu8, 0xFE]);
        artifacts.add_file("jarindex/INDEX.LIST", "JarIndex-Version: 1.0\n");
        assert_eq!(artifacts.file_count(), 2);
        assert_eq!(artifacts.get("module/module-info.class"), Some(&[0xCA, 0xFE][..]));
    }

    #[test]
    fn test_write_to_disk_creates_directories() {
        let mut artifacts = GeneratedArtifacts::new();
        artifacts.add_file("a/b/file.bin", vec![1u8, 2, 3]);

        let dir = tempfile::tempdir().unwrap();
        artifacts.write_to_disk(dir.path()).unwrap();

        assert_eq!(std::fs::read(dir.path().join("a/b/file.bin")).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old contents that are longer").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");

        // no temporary files left next to the target
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_atomic_failure_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("module-info.class");
        std::fs::create_dir(&target).unwrap();

        let err = write_atomic(&target, b"\xCA\xFE\xBA\xBE").unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("module-info.class")]);
        assert!(target.is_dir());
    }

    #[test]
    fn test_generate_both_artifacts() {
        let gen = CodeGenerator::new(ModulePackagesPolicy::WhenHidden);
        let artifacts = gen
            .generate(&config(serde_json::json!({
                "version": "1.0.0",
                "module": { "name": "m", "version": "1", "packages": ["a/b"] },
                "jarIndex": { "jarName": "m.jar" }
            })))
            .unwrap();
        assert_eq!(artifacts.file_count(), 2);
        assert!(artifacts.files().contains_key("module/module-info.class"));
        assert!(artifacts.files().contains_key("jarindex/INDEX.LIST"));
    }

    #[test]
    fn test_generate_without_jar_index() {
        let config = config(serde_json::json!({
            "version": "1.0.0",
            "module": { "name": "m", "version": "1" }
        }));
        let artifacts = CodeGenerator::for_unit(&config).generate(&config).unwrap();
        assert_eq!(artifacts.file_count(), 1);
    }

    #[test]
    fn test_generate_fails_over_capacity() {
        let packages: Vec<String> = (0..124).map(|i| format!("p/{i}")).collect();
        let config = config(serde_json::json!({
            "version": "1.0.0",
            "module": { "name": "m", "version": "1", "packages": packages },
            "jarIndex": { "jarName": "m.jar" }
        }));
        let err = CodeGenerator::for_unit(&config).generate(&config).unwrap_err();
        assert!(matches!(err, CodegenError::CapacityExceeded { .. }));
    }
}
