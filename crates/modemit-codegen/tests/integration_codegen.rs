use std::path::PathBuf;

use modemit_codegen::{
    emit_jar_index, parse_module_info, CodeGenerator, CodegenError, ModuleDescriptor,
    ModuleInfoEmitter,
};
use modemit_config::types::common::ModulePackagesPolicy;
use pretty_assertions::assert_eq;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("fixtures")
}

fn load_fixture(fixture: &str) -> modemit_config::LoadedUnit {
    let path = fixtures_dir().join(fixture);
    modemit_config::load_unit(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}': {}", fixture, e))
}

#[test]
fn test_golden_core_unit_module_info() {
    let unit = load_fixture("core-unit");
    let gen = CodeGenerator::for_unit(&unit.config);
    let output = gen.generate(&unit.config).unwrap();

    assert_eq!(output.file_count(), 2);
    let bytes = output.get("module/module-info.class").unwrap();
    let info = parse_module_info(bytes).unwrap();

    assert_eq!(info.major_version, 53);
    assert_eq!(info.access_flags, 0x8000);
    assert_eq!(info.name, "org.example.core");
    assert_eq!(info.flags, 0);
    assert_eq!(info.version.as_deref(), Some("2.4.1"));

    let requires: Vec<_> = info.requires.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(requires, vec!["java.base", "org.example.logging", "java.sql"]);
    assert!(info.requires.iter().all(|r| r.flags == 0 && r.version.is_none()));

    assert_eq!(
        info.exports,
        vec!["org/example/core", "org/example/core/api", "org/example/core/spi"]
    );
    // internal package is hidden, so ModulePackages lists everything
    assert_eq!(info.attribute_count, 2);
    assert_eq!(
        info.packages.unwrap(),
        vec![
            "org/example/core",
            "org/example/core/api",
            "org/example/core/internal",
            "org/example/core/spi",
        ]
    );
}

#[test]
fn test_golden_core_unit_jar_index() {
    let unit = load_fixture("core-unit");
    let output = CodeGenerator::for_unit(&unit.config)
        .generate(&unit.config)
        .unwrap();

    let index = std::str::from_utf8(output.get("jarindex/INDEX.LIST").unwrap()).unwrap();
    assert_eq!(
        index,
        "JarIndex-Version: 1.0\n\n\
         example-core-2.4.1.jar\n\
         org\n\
         org/example\n\
         org/example/core\n\
         org/example/core/api\n\
         org/example/core/internal\n\
         org/example/core/spi\n\
         module-info.class\n\n"
    );
}

#[test]
fn test_minimal_unit_always_policy_without_packages() {
    let unit = load_fixture("minimal-unit");
    assert_eq!(unit.config.codegen.module_packages, ModulePackagesPolicy::Always);

    let output = CodeGenerator::for_unit(&unit.config)
        .generate(&unit.config)
        .unwrap();
    // no jar index configured
    assert_eq!(output.file_count(), 1);

    let info = parse_module_info(output.get("module/module-info.class").unwrap()).unwrap();
    assert_eq!(info.requires.len(), 1);
    assert!(info.exports.is_empty());
    // an empty ModulePackages attribute is never written
    assert_eq!(info.attribute_count, 1);
    assert_eq!(info.packages, None);
}

#[test]
fn test_always_policy_lists_exported_packages() {
    let d = ModuleDescriptor::new("org.example", "1").with_packages(["org/example/a"]);

    let hidden_only = parse_module_info(&ModuleInfoEmitter::default().emit(&d).unwrap()).unwrap();
    assert_eq!(hidden_only.packages, None);

    let always = ModuleInfoEmitter::new(ModulePackagesPolicy::Always)
        .emit(&d)
        .unwrap();
    let info = parse_module_info(&always).unwrap();
    assert_eq!(info.packages.unwrap(), vec!["org/example/a"]);
    assert_eq!(info.exports, vec!["org/example/a"]);
}

#[test]
fn test_modified_utf8_names_read_back() {
    let d = ModuleDescriptor::new("org.ex\u{0}mple", "1-\u{1F600}")
        .with_packages(["caf\u{e9}/internal"]);
    let info = parse_module_info(&ModuleInfoEmitter::default().emit(&d).unwrap()).unwrap();
    assert_eq!(info.name, "org.ex\u{0}mple");
    assert_eq!(info.version.as_deref(), Some("1-\u{1F600}"));
    assert!(info.exports.is_empty());
    assert_eq!(info.packages.unwrap(), vec!["caf\u{e9}/internal"]);
}

#[test]
fn test_capacity_boundary() {
    let emitter = ModuleInfoEmitter::default();
    let at_limit = ModuleDescriptor::new("m", "1").with_packages((0..123).map(|i| format!("p{i}")));
    let info = parse_module_info(&emitter.emit(&at_limit).unwrap()).unwrap();
    assert_eq!(info.exports.len(), 123);

    let over = at_limit.with_packages(["p123"]);
    let err = emitter.emit(&over).unwrap_err();
    assert!(matches!(err, CodegenError::CapacityExceeded { max: 123, .. }));
    assert!(err.to_string().contains("123"));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let unit = load_fixture("core-unit");
    let gen = CodeGenerator::for_unit(&unit.config);

    let dir = tempfile::tempdir().unwrap();
    gen.generate(&unit.config)
        .unwrap()
        .write_to_disk(dir.path())
        .unwrap();
    let first = std::fs::read(dir.path().join("module/module-info.class")).unwrap();

    gen.generate(&unit.config)
        .unwrap()
        .write_to_disk(dir.path())
        .unwrap();
    let second = std::fs::read(dir.path().join("module/module-info.class")).unwrap();

    assert_eq!(first, second);
    assert!(dir.path().join("jarindex/INDEX.LIST").is_file());
}

#[test]
fn test_jar_index_matches_emitted_packages() {
    let packages = ["b/y", "a/x/internal", "a/x"];
    let index = String::from_utf8(emit_jar_index("lib.jar", &packages)).unwrap();
    let body: Vec<&str> = index.lines().skip(3).collect();
    assert_eq!(
        body,
        vec!["a", "a/x", "a/x/internal", "b", "b/y", "module-info.class", ""]
    );
}
