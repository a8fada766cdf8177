pub mod jar_index;
pub mod module_info;

use modemit_config::types::common::ModulePackagesPolicy;

use crate::traits::ArtifactEmitter;

/// Create every artifact emitter a build unit runs, in emission order.
pub fn create_emitters(policy: ModulePackagesPolicy) -> Vec<Box<dyn ArtifactEmitter>> {
    vec![
        Box::new(module_info::ModuleInfoEmitter::new(policy)),
        Box::new(jar_index::JarIndexEmitter),
    ]
}
