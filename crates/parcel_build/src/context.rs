//! The boundary between the builder and the orchestration host.
//!
//! The builder never decides which files are dirty, where outputs live or how
//! dependency information is stored. It receives that through the traits in
//! this module and reports back through them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::membership::MembershipStore;

/// One build target: where its artifacts go and where its private state lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Target name, unique within a chunk.
    pub name: String,
    /// Root directory for generated artifacts.
    pub output_dir: PathBuf,
    /// Private data directory for persisted per-target state.
    pub data_dir: PathBuf,
}

impl BuildTarget {
    /// Creates a target description.
    pub fn new(name: impl Into<String>, output_dir: &Path, data_dir: &Path) -> Self {
        Self {
            name: name.into(),
            output_dir: output_dir.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
        }
    }
}

/// The host's enumeration of changes since the last successful pass.
pub trait DirtyFilesHolder {
    /// Files added or modified in `target`.
    fn dirty_files(&self, target: &BuildTarget) -> Vec<PathBuf>;
    /// Files removed from `target`.
    fn removed_files(&self, target: &BuildTarget) -> Vec<PathBuf>;
}

/// Receives every artifact written, so the host can clean it up later.
pub trait OutputConsumer {
    /// Records that `output` was produced in `target` from `sources`.
    fn register_output(&mut self, target: &BuildTarget, output: &Path, sources: &[PathBuf]);
}

/// Dependency-graph notification for a newly written unit.
pub trait DependencyRegistrar {
    /// Associates a qualified unit name with the sources that produced it and
    /// the raw unit bytes.
    fn record_artifact(&mut self, qualified_name: &str, sources: &[PathBuf], bytes: &[u8]);
}

/// Reverse lookup into the dependency graph.
pub trait ArtifactMappings {
    /// Sources that produced the unit last recorded under `qualified_name`, or
    /// an empty list if it was never recorded.
    fn artifact_sources(&self, qualified_name: &str) -> Vec<PathBuf>;
}

/// Final bookkeeping of a pass.
pub trait CompileReporter {
    /// Every source compiled by this pass.
    fn files_to_compile(&mut self, files: &[PathBuf]);
    /// Marks those sources as successfully compiled.
    fn successfully_compiled(&mut self, files: &[PathBuf]);
}

/// Everything the builder needs from the host besides dirty files and stores.
pub trait CompileContext:
    OutputConsumer + DependencyRegistrar + ArtifactMappings + CompileReporter
{
}

impl<T> CompileContext for T where
    T: OutputConsumer + DependencyRegistrar + ArtifactMappings + CompileReporter
{
}

/// Hands out the membership store scoped to a target.
pub trait StoreProvider {
    /// Returns the store for `target`, loading it on first use.
    fn store(&mut self, target: &BuildTarget) -> Result<&mut dyn MembershipStore, BuildError>;
}

/// A plain per-target dirty set, keyed by target name.
#[derive(Debug, Clone, Default)]
pub struct DirtySet {
    dirty: BTreeMap<String, Vec<PathBuf>>,
    removed: BTreeMap<String, Vec<PathBuf>>,
}

impl DirtySet {
    /// Creates an empty dirty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `path` as added or modified in `target`.
    pub fn mark_dirty(&mut self, target: &str, path: impl Into<PathBuf>) {
        self.dirty
            .entry(target.to_string())
            .or_default()
            .push(path.into());
    }

    /// Marks `path` as removed from `target`.
    pub fn mark_removed(&mut self, target: &str, path: impl Into<PathBuf>) {
        self.removed
            .entry(target.to_string())
            .or_default()
            .push(path.into());
    }

    /// Returns `true` if nothing was marked for any target.
    pub fn is_empty(&self) -> bool {
        self.dirty.values().all(Vec::is_empty) && self.removed.values().all(Vec::is_empty)
    }
}

impl DirtyFilesHolder for DirtySet {
    fn dirty_files(&self, target: &BuildTarget) -> Vec<PathBuf> {
        self.dirty.get(&target.name).cloned().unwrap_or_default()
    }

    fn removed_files(&self, target: &BuildTarget) -> Vec<PathBuf> {
        self.removed.get(&target.name).cloned().unwrap_or_default()
    }
}
