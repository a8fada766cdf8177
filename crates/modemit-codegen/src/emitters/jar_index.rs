use indexmap::IndexSet;
use modemit_config::types::config::UnitConfig;

use crate::error::CodegenError;
use crate::traits::ArtifactEmitter;

pub const VERSION_LINE: &str = "JarIndex-Version: 1.0";
pub const MODULE_INFO_CLASS: &str = "module-info.class";

/// Build a legacy `INDEX.LIST` for a single jar.
///
/// Packages are sorted by UTF-16 code units, then every '/' prefix of each package is listed the
/// first time it is seen, followed by the package itself. The resulting order
/// is first-discovery order under sorted packages, not a sort of the prefixes.
pub fn emit_jar_index<S: AsRef<str>>(jar_name: &str, packages: &[S]) -> Vec<u8> {
    let mut sorted: Vec<&str> = packages.iter().map(AsRef::as_ref).collect();
    sorted.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));

    let mut emitted: IndexSet<&str> = IndexSet::new();
    for package in sorted {
        for (slash, _) in package.match_indices('/') {
            emitted.insert(&package[..slash]);
        }
        emitted.insert(package);
    }

    let mut out = String::new();
    push_line(&mut out, VERSION_LINE);
    push_line(&mut out, "");
    push_line(&mut out, jar_name);
    for entry in &emitted {
        push_line(&mut out, entry);
    }
    push_line(&mut out, MODULE_INFO_CLASS);
    push_line(&mut out, "");

    tracing::debug!(jar = jar_name, entries = emitted.len(), "encoded jar index");

    out.into_bytes()
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Emits `INDEX.LIST` when the unit configures a jar index.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarIndexEmitter;

impl ArtifactEmitter for JarIndexEmitter {
    fn name(&self) -> &'static str {
        "jar-index"
    }

    fn artifact_path(&self) -> &'static str {
        "jarindex/INDEX.LIST"
    }

    fn emit_artifact(&self, config: &UnitConfig) -> Result<Option<Vec<u8>>, CodegenError> {
        Ok(config
            .jar_index
            .as_ref()
            .map(|index| emit_jar_index(&index.jar_name, &config.module.packages)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(bytes: &[u8]) -> Vec<&str> {
        std::str::from_utf8(bytes).unwrap().lines().collect()
    }

    #[test]
    fn test_shared_prefixes_listed_once() {
        let bytes = emit_jar_index("x.jar", &["a/b/c", "a/b/d"]);
        assert_eq!(
            lines(&bytes),
            vec![
                "JarIndex-Version: 1.0",
                "",
                "x.jar",
                "a",
                "a/b",
                "a/b/c",
                "a/b/d",
                "module-info.class",
                "",
            ]
        );
    }

    #[test]
    fn test_exact_text() {
        let bytes = emit_jar_index("x.jar", &["p"]);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "JarIndex-Version: 1.0\n\nx.jar\np\nmodule-info.class\n\n"
        );
    }

    #[test]
    fn test_first_discovery_order_under_sorted_packages() {
        // '-' sorts before '/', so "a-b" is processed before "a/c" and
        // lands ahead of the "a" prefix.
        let bytes = emit_jar_index("j.jar", &["a/c", "a-b"]);
        assert_eq!(
            lines(&bytes)[3..].to_vec(),
            vec!["a-b", "a", "a/c", "module-info.class", ""]
        );
    }

    #[test]
    fn test_package_that_is_also_a_prefix() {
        let bytes = emit_jar_index("j.jar", &["org/b", "org/a/x", "org/a", "com/z"]);
        assert_eq!(
            lines(&bytes)[3..].to_vec(),
            vec!["com", "com/z", "org", "org/a", "org/a/x", "org/b", "module-info.class", ""]
        );
    }

    #[test]
    fn test_sorts_by_utf16_code_units() {
        // U+10000 is the surrogate pair D800 DC00, which sorts before U+E000
        // in UTF-16 but after it in UTF-8.
        let bytes = emit_jar_index("j.jar", &["\u{E000}", "\u{10000}"]);
        assert_eq!(
            lines(&bytes)[3..5].to_vec(),
            vec!["\u{10000}", "\u{E000}"]
        );
    }

    #[test]
    fn test_empty_package_list() {
        let bytes = emit_jar_index::<&str>("e.jar", &[]);
        assert_eq!(
            lines(&bytes),
            vec!["JarIndex-Version: 1.0", "", "e.jar", "module-info.class", ""]
        );
    }

    #[test]
    fn test_emitter_skips_unit_without_index() {
        let config: UnitConfig = serde_json::from_value(serde_json::json!({
            "version": "1.0.0",
            "module": { "name": "m", "version": "1", "packages": ["a/b"] }
        }))
        .unwrap();
        assert_eq!(JarIndexEmitter.emit_artifact(&config).unwrap(), None);
    }
}
