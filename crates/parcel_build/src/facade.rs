//! Facade regeneration: recompute the aggregate unit of every group whose
//! membership may have changed.
//!
//! A group is a candidate when a source was emitted into it this pass, when a
//! recompiled source belonged to it before, or when a removed source belonged
//! to it according to the membership store. The live members of a candidate
//! are found by rescanning directories rather than trusting any index: the
//! parents of the sources emitted into the group this pass, plus the parents
//! of the sources its previous facade was built from.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use parcel_common::{base_name, qualified_name, GroupKey};
use tracing::debug;

use crate::context::{BuildTarget, CompileContext};
use crate::emit::{emit, FieldSpec, FACADE_NAME};
use crate::error::BuildError;
use crate::group::{is_compilable, GroupCache};
use crate::membership::MembershipStore;

/// What facade regeneration did for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacadeReport {
    /// Groups whose facade was rewritten.
    pub regenerated: Vec<GroupKey>,
    /// Candidate groups with no live member; their facade was left alone.
    pub skipped: Vec<GroupKey>,
    /// Directories listed while looking for members.
    pub directories_scanned: usize,
}

/// Builds the candidate group set.
pub fn candidate_groups<'a>(
    emitted: impl IntoIterator<Item = &'a GroupKey>,
    previous: impl IntoIterator<Item = GroupKey>,
) -> BTreeSet<GroupKey> {
    let mut candidates: BTreeSet<GroupKey> = emitted.into_iter().cloned().collect();
    candidates.extend(previous);
    candidates
}

/// Regenerates the facade of every candidate group of `target`.
///
/// `emitted` are the sources compiled this pass with their declared groups.
/// Each regenerated facade lists its members sorted by base name, and every
/// member's membership entry is refreshed to the group.
pub fn regenerate(
    ctx: &mut dyn CompileContext,
    store: &mut dyn MembershipStore,
    groups: &mut GroupCache,
    target: &BuildTarget,
    emitted: &[(PathBuf, GroupKey)],
    candidates: &BTreeSet<GroupKey>,
) -> Result<FacadeReport, BuildError> {
    let mut report = FacadeReport::default();

    for group in candidates {
        let dirs = directories_to_scan(ctx, group, emitted);
        report.directories_scanned += dirs.len();

        let mut members = Vec::new();
        for dir in &dirs {
            for path in list_compilable(dir)? {
                if groups.group_of(&path)? == *group {
                    members.push((base_name(&path), path));
                }
            }
        }

        if members.is_empty() {
            debug!(target = %target.name, %group, "no live members, facade left as is");
            report.skipped.push(group.clone());
            continue;
        }

        members.sort();
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(members.len());
        for (name, _) in &members {
            if fields.last().map(|f| &f.type_name) != Some(&qualified_name(group, name)) {
                fields.push(FieldSpec::member(group, name));
            }
        }
        let sources: Vec<PathBuf> = members.into_iter().map(|(_, path)| path).collect();

        emit(ctx, target, group, FACADE_NAME, &sources, &fields)?;
        for source in &sources {
            store.put(source, group);
        }
        debug!(
            target = %target.name,
            %group,
            members = sources.len(),
            dirs = dirs.len(),
            "regenerated facade"
        );
        report.regenerated.push(group.clone());
    }

    Ok(report)
}

/// Parents of this pass's sources in `group`, plus parents of the sources of
/// the group's previous facade.
fn directories_to_scan(
    ctx: &dyn CompileContext,
    group: &GroupKey,
    emitted: &[(PathBuf, GroupKey)],
) -> BTreeSet<PathBuf> {
    let previous = ctx.artifact_sources(&qualified_name(group, FACADE_NAME));
    emitted
        .iter()
        .filter(|(_, g)| g == group)
        .map(|(path, _)| path.as_path())
        .chain(previous.iter().map(PathBuf::as_path))
        .filter_map(Path::parent)
        .map(Path::to_path_buf)
        .collect()
}

/// Lists compilable regular files directly inside `dir`.
///
/// A directory that no longer exists has no members.
fn list_compilable(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BuildError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::io(dir, e))?;
        let path = entry.path();
        if is_compilable(&path) && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Groups emitted sources by group, for log summaries.
pub fn by_group(emitted: &[(PathBuf, GroupKey)]) -> BTreeMap<&GroupKey, usize> {
    let mut counts = BTreeMap::new();
    for (_, group) in emitted {
        *counts.entry(group).or_insert(0) += 1;
    }
    counts
}
