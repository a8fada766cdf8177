use std::path::Path;

use modemit_config::types::common::{
    is_internal_package, ModulePackagesPolicy, JAVA_BASE, MAX_DECLARED_ENTRIES,
};
use modemit_config::types::config::UnitConfig;

use crate::attribute::AttributeBuilder;
use crate::bytes::ByteWriter;
use crate::constant_pool::ConstantPool;
use crate::descriptor::ModuleDescriptor;
use crate::error::CodegenError;
use crate::generator::write_atomic;
use crate::traits::ArtifactEmitter;

pub const MAGIC: u32 = 0xCAFE_BABE;
pub const MINOR_VERSION: u16 = 0;
/// Java 9, the first release that reads module descriptors.
pub const MAJOR_VERSION: u16 = 53;

pub const ACC_MODULE: u16 = 0x8000;

pub const MODULE_INFO: &str = "module-info";
pub const ATTR_MODULE: &str = "Module";
pub const ATTR_MODULE_PACKAGES: &str = "ModulePackages";

/// Writes a minimal `module-info.class` carrying `requires`, `exports`, and
/// optionally a `ModulePackages` attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleInfoEmitter {
    policy: ModulePackagesPolicy,
}

impl ModuleInfoEmitter {
    pub fn new(policy: ModulePackagesPolicy) -> Self {
        Self { policy }
    }

    /// Build the classfile bytes for `descriptor`.
    ///
    /// Fails with [`CodegenError::CapacityExceeded`] before anything is
    /// encoded when more than [`MAX_DECLARED_ENTRIES`] requires and packages
    /// are declared.
    pub fn emit(&self, descriptor: &ModuleDescriptor) -> Result<Vec<u8>, CodegenError> {
        if descriptor.declared_entries() > MAX_DECLARED_ENTRIES {
            return Err(CodegenError::CapacityExceeded {
                requires: descriptor.requires.len(),
                packages: descriptor.packages.len(),
                max: MAX_DECLARED_ENTRIES,
            });
        }

        // Fixed entries #1..#9, then one (Utf8, Module|Package) pair per
        // declared require and package.
        let mut pool = ConstantPool::new();
        let self_name = pool.utf8(MODULE_INFO)?;
        let this_class = pool.class(self_name)?;
        let module_attr = pool.utf8(ATTR_MODULE)?;
        let packages_attr = pool.utf8(ATTR_MODULE_PACKAGES)?;
        let module = pool.module(&descriptor.name)?;
        let version = pool.utf8(&descriptor.version)?;
        let java_base = pool.module(JAVA_BASE)?;

        let requires = descriptor
            .requires
            .iter()
            .map(|name| pool.module(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut packages = Vec::with_capacity(descriptor.packages.len());
        let mut exports = Vec::with_capacity(descriptor.packages.len());
        for path in &descriptor.packages {
            let index = pool.package(path)?;
            packages.push(index);
            if !is_internal_package(path) {
                exports.push(index);
            }
        }

        let write_packages = match self.policy {
            ModulePackagesPolicy::WhenHidden => exports.len() < packages.len(),
            ModulePackagesPolicy::Always => !packages.is_empty(),
        };

        let mut out = ByteWriter::with_capacity(256);
        out.write_u4(MAGIC);
        out.write_u2(MINOR_VERSION);
        out.write_u2(MAJOR_VERSION);
        pool.write_to(&mut out)?;

        out.write_u2(ACC_MODULE);
        out.write_u2(this_class);
        // super_class, interfaces_count, fields_count, methods_count
        out.write_zeros(8);
        out.write_u2(if write_packages { 2 } else { 1 });

        let mut attr = AttributeBuilder::new(module_attr);
        attr.write_u2(module);
        attr.write_u2(0); // module_flags
        attr.write_u2(version);

        attr.write_u2(count(requires.len() + 1));
        // every require, java.base included, is (module_index, 0, 0)
        for index in std::iter::once(&java_base).chain(&requires) {
            attr.write_u2(*index);
            attr.write_u2(0);
            attr.write_u2(0);
        }

        attr.write_u2(count(exports.len()));
        for index in &exports {
            attr.write_u2(*index);
            attr.write_u2(0); // exports_flags
            attr.write_u2(0); // exports_to_count
        }

        // opens_count, uses_count, provides_count
        attr.write_zeros(6);
        let module_len = attr.finish(&mut out)?;

        if write_packages {
            let mut attr = AttributeBuilder::new(packages_attr);
            attr.write_u2(count(packages.len()));
            for index in &packages {
                attr.write_u2(*index);
            }
            attr.finish(&mut out)?;
        }

        tracing::debug!(
            module = %descriptor.name,
            constant_pool_count = pool.count(),
            module_attribute_len = module_len,
            exports = exports.len(),
            hidden = packages.len() - exports.len(),
            module_packages = write_packages,
            "encoded module-info.class"
        );

        Ok(out.into_inner())
    }

    /// Emit `descriptor` and commit it to `path` atomically.
    pub fn emit_to_file(
        &self,
        descriptor: &ModuleDescriptor,
        path: &Path,
    ) -> Result<(), CodegenError> {
        let bytes = self.emit(descriptor)?;
        write_atomic(path, &bytes)
    }
}

// Bounded by MAX_DECLARED_ENTRIES.
fn count(len: usize) -> u16 {
    len as u16
}

impl ArtifactEmitter for ModuleInfoEmitter {
    fn name(&self) -> &'static str {
        "module-info"
    }

    fn artifact_path(&self) -> &'static str {
        "module/module-info.class"
    }

    fn emit_artifact(&self, config: &UnitConfig) -> Result<Option<Vec<u8>>, CodegenError> {
        self.emit(&ModuleDescriptor::from(&config.module)).map(Some)
    }
}
