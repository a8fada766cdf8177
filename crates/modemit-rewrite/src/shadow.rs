//! Renames shadow classes compiled under a temporary `$$$$`-suffixed name.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use modemit_codegen::bytes::ByteWriter;
use modemit_codegen::constant_pool::TAG_UTF8;
use modemit_codegen::{parse_header, write_atomic};
use walkdir::WalkDir;

use crate::error::RewriteError;
use crate::traits::{ClassTransform, RenamedClass, TransformReport};

/// Separates a shadow class's real name from its temporary suffix.
pub const SHADOW_MARKER: &str = "$$$$";

/// Truncates every `this_class` name at [`SHADOW_MARKER`] and writes the
/// class under its new name. Only the Utf8 entry `this_class` points at is
/// rewritten; every other byte is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRename;

impl ClassTransform for ShadowRename {
    fn name(&self) -> &'static str {
        "shadow-rename"
    }

    fn transform(&self, input: &Path, output: &Path) -> Result<TransformReport, RewriteError> {
        if !input.is_dir() {
            return Err(RewriteError::io(
                input,
                std::io::Error::new(std::io::ErrorKind::NotFound, "input is not a directory"),
            ));
        }

        // The walk is lazy, so outputs written under `input` would be visited again.
        let input_abs = input.canonicalize().map_err(|e| RewriteError::io(input, e))?;
        let output_abs = resolve_path(output).map_err(|e| RewriteError::io(output, e))?;
        if output_abs.starts_with(&input_abs) {
            return Err(RewriteError::OutputInsideInput {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
            });
        }

        let mut report = TransformReport::default();
        let mut written = BTreeSet::new();

        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(input).to_path_buf();
                RewriteError::io(path, e.into())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "class")
            {
                continue;
            }

            let parse_err = |source| RewriteError::Parse {
                path: path.to_path_buf(),
                source,
            };
            let bytes = std::fs::read(path).map_err(|e| RewriteError::io(path, e))?;
            let header = parse_header(&bytes).map_err(parse_err)?;
            let name = header.this_class_name().map_err(parse_err)?;

            let Some(marker_at) = name.find(SHADOW_MARKER) else {
                let rel = path.strip_prefix(input).unwrap_or(path);
                let target = output.join(rel);
                write_atomic(&target, &bytes)?;
                tracing::warn!(class = name, "no shadow marker, copied unchanged");
                note_target(&mut written, &target);
                report.copied.push(target);
                continue;
            };

            let new_name = &name[..marker_at];
            let target = class_output_path(output, new_name).ok_or_else(|| {
                RewriteError::OutputEscapesRoot {
                    path: path.to_path_buf(),
                    name: new_name.to_string(),
                }
            })?;

            let name_index = header
                .constant_pool
                .class_name_index(header.this_class)
                .map_err(parse_err)?;
            let span = header.constant_pool.span(name_index).map_err(parse_err)?;

            let mut out = ByteWriter::with_capacity(bytes.len());
            out.write_bytes(&bytes[..span.start]);
            out.write_u1(TAG_UTF8);
            out.write_utf(new_name)?;
            out.write_bytes(&bytes[span.end..]);

            write_atomic(&target, out.as_slice())?;
            tracing::debug!(from = name, to = new_name, "renamed shadow class");
            note_target(&mut written, &target);
            report.renamed.push(RenamedClass {
                from: name.to_string(),
                to: new_name.to_string(),
                output: target,
            });
        }

        Ok(report)
    }
}

/// `<output>/<internal/name>.class`, or `None` if the name would leave
/// `output` or is empty.
fn class_output_path(output: &Path, internal_name: &str) -> Option<PathBuf> {
    let rel = PathBuf::from(format!("{internal_name}.class"));
    let confined = internal_name
        .split('/')
        .all(|segment| !matches!(segment, "" | "." | ".."))
        && rel
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    confined.then(|| output.join(rel))
}

/// Canonical form of `path`, which need not exist yet: the deepest existing
/// ancestor is canonicalized and the remaining components appended.
fn resolve_path(path: &Path) -> std::io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(mut resolved) => {
                resolved.extend(missing.iter().rev());
                return Ok(resolved);
            }
            Err(err) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name);
                    existing = if parent.as_os_str().is_empty() {
                        Path::new(".")
                    } else {
                        parent
                    };
                }
                _ => return Err(err),
            },
        }
    }
}

fn note_target(written: &mut BTreeSet<PathBuf>, target: &Path) {
    if !written.insert(target.to_path_buf()) {
        tracing::warn!(path = %target.display(), "output written more than once");
    }
}
