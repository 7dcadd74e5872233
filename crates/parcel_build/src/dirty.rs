//! Dirty-set collection: which compilable sources a pass must look at.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::context::{BuildTarget, DirtyFilesHolder};
use crate::group::is_compilable;

/// The compilable changes of one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetChanges {
    /// Added or modified sources, deduplicated, in enumeration order.
    pub to_compile: Vec<PathBuf>,
    /// Removed sources.
    pub removed: Vec<PathBuf>,
}

impl TargetChanges {
    /// Returns `true` if the target has nothing compilable to process.
    pub fn is_empty(&self) -> bool {
        self.to_compile.is_empty() && self.removed.is_empty()
    }
}

/// Collects the compilable changes of every target in the chunk.
///
/// Returns `None` when no target has a compilable dirty file and no target
/// lost a compilable file; the pass then does nothing at all.
pub fn collect(
    chunk: &[BuildTarget],
    holder: &dyn DirtyFilesHolder,
) -> Option<Vec<(BuildTarget, TargetChanges)>> {
    let collected: Vec<_> = chunk
        .iter()
        .map(|target| (target.clone(), collect_target(target, holder)))
        .collect();

    if collected.iter().all(|(_, changes)| changes.is_empty()) {
        None
    } else {
        Some(collected)
    }
}

fn collect_target(target: &BuildTarget, holder: &dyn DirtyFilesHolder) -> TargetChanges {
    let mut seen = BTreeSet::new();
    let to_compile = holder
        .dirty_files(target)
        .into_iter()
        .filter(|p| is_compilable(p) && seen.insert(p.clone()))
        .collect();
    let removed = holder
        .removed_files(target)
        .into_iter()
        .filter(|p| is_compilable(p))
        .collect();
    TargetChanges {
        to_compile,
        removed,
    }
}
