//! Writing compiled units and announcing them to the host.

use std::path::{Path, PathBuf};

use parcel_common::{decapitalize, qualified_name, GroupKey};
use tracing::trace;

use crate::context::{BuildTarget, CompileContext};
use crate::error::BuildError;
use crate::unit::CompiledUnit;

/// File extension of generated artifacts.
pub const ARTIFACT_EXTENSION: &str = "unit";

/// Short name of every group's aggregate unit.
pub const FACADE_NAME: &str = "PackageFacade";

/// A member reference for a facade field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name (decapitalized member base name).
    pub name: String,
    /// Qualified name of the member's unit.
    pub type_name: String,
}

impl FieldSpec {
    /// The field a facade of `group` carries for member `base_name`.
    pub fn member(group: &GroupKey, base_name: &str) -> Self {
        Self {
            name: decapitalize(base_name),
            type_name: qualified_name(group, base_name),
        }
    }
}

/// A unit written by the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Dotted qualified name.
    pub qualified_name: String,
    /// Where the unit was written.
    pub path: PathBuf,
    /// Encoded unit.
    pub bytes: Vec<u8>,
    /// Sources that produced the unit.
    pub sources: Vec<PathBuf>,
}

/// Returns the output file for unit `name` of `group` in `target`.
pub fn artifact_path(target: &BuildTarget, group: &GroupKey, name: &str) -> PathBuf {
    target
        .output_dir
        .join(group.as_path())
        .join(format!("{name}.{ARTIFACT_EXTENSION}"))
}

/// Emits the unit `<group>/<name>` with the given fields.
///
/// The file is overwritten if it exists, registered as an output of `sources`
/// and recorded in the dependency graph under its qualified name.
pub fn emit(
    ctx: &mut dyn CompileContext,
    target: &BuildTarget,
    group: &GroupKey,
    name: &str,
    sources: &[PathBuf],
    fields: &[FieldSpec],
) -> Result<Artifact, BuildError> {
    let qualified = qualified_name(group, name);
    let unit = fields.iter().fold(
        CompiledUnit::new(qualified.replace('.', "/")),
        |unit, field| unit.with_field(&field.name, &field.type_name),
    );
    let bytes = unit.to_bytes()?;

    let path = artifact_path(target, group, name);
    write_file(&path, &bytes)?;
    ctx.register_output(target, &path, sources);
    ctx.record_artifact(&qualified, sources, &bytes);
    trace!(unit = %qualified, path = %path.display(), fields = fields.len(), "wrote unit");

    Ok(Artifact {
        qualified_name: qualified,
        path,
        bytes,
        sources: sources.to_vec(),
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| BuildError::io(path, e))
}
