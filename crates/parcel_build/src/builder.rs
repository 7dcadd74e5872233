//! One incremental build pass over a chunk of targets.
//!
//! For each target, in order:
//! 1. Collect compilable dirty and removed sources
//! 2. Recover the previous groups of recompiled and removed sources
//! 3. Emit one unit per dirty source and record its group
//! 4. Regenerate the facade of every candidate group
//!
//! Then report every compiled source to the host. Any error aborts the pass
//! for the whole chunk.

use std::path::PathBuf;

use parcel_common::{base_name, GroupKey};
use tracing::{debug, info};

use crate::context::{BuildTarget, CompileContext, DirtyFilesHolder, StoreProvider};
use crate::dirty::{self, TargetChanges};
use crate::emit::emit;
use crate::error::BuildError;
use crate::facade::{self, by_group};
use crate::group::GroupCache;

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Nothing compilable changed; no file was read or written.
    NothingDone,
    /// Units were emitted and facades regenerated as needed.
    Ok,
}

/// What a pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// How the pass ended.
    pub exit: ExitCode,
    /// Every source compiled, across all targets.
    pub compiled: Vec<PathBuf>,
    /// Units written, per-source units and facades together.
    pub artifacts_written: usize,
    /// Directories listed while regenerating facades.
    pub directories_scanned: usize,
    /// `(target, group)` of every regenerated facade.
    pub facades: Vec<(String, GroupKey)>,
    /// `(target, group)` of candidate groups left without live members.
    pub skipped: Vec<(String, GroupKey)>,
}

impl BuildSummary {
    fn nothing_done() -> Self {
        Self {
            exit: ExitCode::NothingDone,
            compiled: Vec::new(),
            artifacts_written: 0,
            directories_scanned: 0,
            facades: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Compiles `.p` sources into units and keeps one facade per package.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageFacadeBuilder;

impl PackageFacadeBuilder {
    /// Human-readable builder name.
    pub const NAME: &'static str = "Package Facade Generator";

    /// Creates the builder.
    pub fn new() -> Self {
        Self
    }

    /// Runs one pass over `chunk`.
    pub fn build(
        &self,
        ctx: &mut dyn CompileContext,
        stores: &mut dyn StoreProvider,
        chunk: &[BuildTarget],
        dirty: &dyn DirtyFilesHolder,
    ) -> Result<BuildSummary, BuildError> {
        let Some(changes) = dirty::collect(chunk, dirty) else {
            debug!(builder = Self::NAME, targets = chunk.len(), "nothing to do");
            return Ok(BuildSummary::nothing_done());
        };

        let all_to_compile: Vec<PathBuf> = changes
            .iter()
            .flat_map(|(_, c)| c.to_compile.iter().cloned())
            .collect();
        if !all_to_compile.is_empty() {
            info!(builder = Self::NAME, files = all_to_compile.len(), "compiling files");
        }

        let mut summary = BuildSummary {
            exit: ExitCode::Ok,
            compiled: all_to_compile,
            ..BuildSummary::nothing_done()
        };
        let mut groups = GroupCache::new();

        for (target, target_changes) in &changes {
            self.build_target(ctx, stores, &mut groups, target, target_changes, &mut summary)?;
        }

        ctx.files_to_compile(&summary.compiled);
        ctx.successfully_compiled(&summary.compiled);
        Ok(summary)
    }

    fn build_target(
        &self,
        ctx: &mut dyn CompileContext,
        stores: &mut dyn StoreProvider,
        groups: &mut GroupCache,
        target: &BuildTarget,
        changes: &TargetChanges,
        summary: &mut BuildSummary,
    ) -> Result<(), BuildError> {
        let store = stores.store(target)?;

        // Read before emission overwrites the entries of recompiled sources.
        let previous: Vec<GroupKey> = changes
            .to_compile
            .iter()
            .chain(&changes.removed)
            .filter_map(|path| store.get(path))
            .collect();

        let mut emitted: Vec<(PathBuf, GroupKey)> = Vec::with_capacity(changes.to_compile.len());
        for path in &changes.to_compile {
            let group = groups.group_of(path)?;
            emit(ctx, target, &group, &base_name(path), &[path.clone()], &[])?;
            store.put(path, &group);
            emitted.push((path.clone(), group));
        }
        summary.artifacts_written += emitted.len();
        debug!(
            target = %target.name,
            emitted = emitted.len(),
            removed = changes.removed.len(),
            groups = by_group(&emitted).len(),
            "emitted per-source units"
        );

        let candidates = facade::candidate_groups(emitted.iter().map(|(_, g)| g), previous);
        let report = facade::regenerate(ctx, store, groups, target, &emitted, &candidates)?;

        summary.artifacts_written += report.regenerated.len();
        summary.directories_scanned += report.directories_scanned;
        summary.facades.extend(
            report
                .regenerated
                .into_iter()
                .map(|g| (target.name.clone(), g)),
        );
        summary
            .skipped
            .extend(report.skipped.into_iter().map(|g| (target.name.clone(), g)));
        Ok(())
    }
}
