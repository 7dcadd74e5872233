//! High-level build orchestrator.
//!
//! [`TargetCache`] ties the manifest, artifact graph and output registry of one
//! target together; [`BuildCache`] runs one pass per target through the
//! [`PackageFacadeBuilder`]. Each target runs as its own single-target chunk,
//! so qualified unit names never collide across targets.
//!
//! Before a pass, every output produced from a changed or removed source is
//! deleted; the pass rewrites those that still have live sources.
//!
//! State is saved only after a successful pass. A failed pass leaves the
//! previous manifest in place, so the next run sees the same changes again.

use std::path::{Path, PathBuf};

use parcel_build::{
    ArtifactMappings, BuildSummary, BuildTarget, CompileReporter, DependencyRegistrar, DirtySet,
    OutputConsumer, PackageFacadeBuilder,
};
use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::graph::ArtifactGraph;
use crate::hasher::{ChangeSet, SourceHasher};
use crate::manifest::SourceManifest;
use crate::outputs::OutputRegistry;
use crate::stores::TargetStores;

/// A target together with the directories its sources live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSources {
    /// Output and data locations.
    pub target: BuildTarget,
    /// Source roots, walked recursively.
    pub source_dirs: Vec<PathBuf>,
}

/// Persisted state of one target.
pub struct TargetCache {
    manifest: SourceManifest,
    graph: ArtifactGraph,
    outputs: OutputRegistry,
}

impl TargetCache {
    /// Loads the state in `data_dir`, or starts fresh.
    ///
    /// A missing, corrupt or incompatible manifest yields an empty one, which
    /// makes every source new. A missing or corrupt graph or output registry
    /// starts empty.
    pub fn load_or_create(data_dir: &Path, parcel_version: &str) -> Self {
        let manifest = SourceManifest::load(data_dir)
            .filter(|m| m.is_compatible(parcel_version))
            .unwrap_or_else(|| SourceManifest::new(parcel_version));
        Self {
            manifest,
            graph: ArtifactGraph::load(data_dir).unwrap_or_default(),
            outputs: OutputRegistry::load(data_dir).unwrap_or_default(),
        }
    }

    /// Hashes the files under `source_dirs` and compares them to the manifest.
    ///
    /// Returns the change set together with the current hashes.
    pub fn detect_changes(
        &self,
        source_dirs: &[PathBuf],
    ) -> Result<(ChangeSet, SourceManifest), CacheError> {
        let files = SourceHasher::discover(source_dirs)?;
        let hashes = SourceHasher::hash_files(&files);
        let changes = SourceHasher::detect_changes(&hashes, &self.manifest);
        let mut current = SourceManifest::new(&self.manifest.parcel_version);
        current.files = hashes.into_iter().collect();
        Ok((changes, current))
    }

    /// Persists the manifest, graph and output registry to `data_dir`.
    pub fn save(&self, data_dir: &Path) -> Result<(), CacheError> {
        self.manifest.save(data_dir)?;
        self.graph.save(data_dir)?;
        self.outputs.save(data_dir)
    }

    /// The manifest of the last successful pass.
    pub fn manifest(&self) -> &SourceManifest {
        &self.manifest
    }

    /// The artifact graph.
    pub fn graph(&self) -> &ArtifactGraph {
        &self.graph
    }

    /// The output registry.
    pub fn outputs(&self) -> &OutputRegistry {
        &self.outputs
    }
}

/// What one target's pass did.
#[derive(Debug, Clone)]
pub struct TargetReport {
    /// Target name.
    pub name: String,
    /// Changes detected before the pass.
    pub changes: ChangeSet,
    /// Outputs deleted before the pass because a source of theirs changed or
    /// was removed.
    pub reclaimed: Vec<PathBuf>,
    /// The builder's summary.
    pub summary: BuildSummary,
}

/// Runs build passes and reports changes for a set of targets.
pub struct BuildCache {
    parcel_version: String,
    rebuild: bool,
}

impl BuildCache {
    /// Creates an orchestrator for state written by `parcel_version`.
    pub fn new(parcel_version: &str) -> Self {
        Self {
            parcel_version: parcel_version.to_string(),
            rebuild: false,
        }
    }

    /// Treats every source as modified, regardless of the manifest.
    pub fn with_rebuild(mut self, rebuild: bool) -> Self {
        self.rebuild = rebuild;
        self
    }

    /// Changes since the last successful pass of `sources`, without building.
    pub fn status(&self, sources: &TargetSources) -> Result<ChangeSet, CacheError> {
        let cache = TargetCache::load_or_create(&sources.target.data_dir, &self.parcel_version);
        let (changes, _) = cache.detect_changes(&sources.source_dirs)?;
        Ok(changes)
    }

    /// Runs one pass per target, in order. Stops at the first failure.
    pub fn build(&self, targets: &[TargetSources]) -> Result<Vec<TargetReport>, CacheError> {
        let mut stores = TargetStores::new();
        let mut reports = Vec::with_capacity(targets.len());
        for sources in targets {
            reports.push(self.build_target(sources, &mut stores)?);
        }
        Ok(reports)
    }

    fn build_target(
        &self,
        sources: &TargetSources,
        stores: &mut TargetStores,
    ) -> Result<TargetReport, CacheError> {
        let target = &sources.target;
        let mut cache = TargetCache::load_or_create(&target.data_dir, &self.parcel_version);
        let (mut changes, current) = cache.detect_changes(&sources.source_dirs)?;
        if self.rebuild {
            changes
                .modified_files
                .append(&mut changes.unchanged_files);
            changes.modified_files.sort();
        }
        debug!(
            target = %target.name,
            new = changes.new_files.len(),
            modified = changes.modified_files.len(),
            deleted = changes.deleted_files.len(),
            "detected changes"
        );

        let dirty_files = changes.dirty();
        let mut stale = dirty_files.clone();
        stale.extend(changes.deleted_files.iter().cloned());
        let reclaimed = cache.outputs.reclaim(&stale)?;
        cache.graph.forget_sources(&stale);

        let mut dirty = DirtySet::new();
        for path in dirty_files {
            dirty.mark_dirty(&target.name, path);
        }
        for path in &changes.deleted_files {
            dirty.mark_removed(&target.name, path.clone());
        }

        let summary = {
            let mut ctx = PassContext {
                graph: &mut cache.graph,
                outputs: &mut cache.outputs,
                target: &target.name,
            };
            PackageFacadeBuilder::new().build(
                &mut ctx,
                stores,
                std::slice::from_ref(target),
                &dirty,
            )
        };
        let summary = match summary {
            Ok(summary) => summary,
            Err(e) => {
                warn!(target = %target.name, error = %e, "pass failed, state not saved");
                return Err(e.into());
            }
        };

        if !changes.is_empty() || self.rebuild || !reclaimed.is_empty() {
            cache.manifest = current;
            cache.save(&target.data_dir)?;
            stores.flush_all()?;
        }

        Ok(TargetReport {
            name: target.name.clone(),
            changes,
            reclaimed,
            summary,
        })
    }
}

/// The host side of one target's pass.
struct PassContext<'a> {
    graph: &'a mut ArtifactGraph,
    outputs: &'a mut OutputRegistry,
    target: &'a str,
}

impl OutputConsumer for PassContext<'_> {
    fn register_output(&mut self, target: &BuildTarget, output: &Path, sources: &[PathBuf]) {
        self.outputs.register_output(target, output, sources);
    }
}

impl DependencyRegistrar for PassContext<'_> {
    fn record_artifact(&mut self, qualified_name: &str, sources: &[PathBuf], bytes: &[u8]) {
        self.graph.record_artifact(qualified_name, sources, bytes);
    }
}

impl ArtifactMappings for PassContext<'_> {
    fn artifact_sources(&self, qualified_name: &str) -> Vec<PathBuf> {
        self.graph.artifact_sources(qualified_name)
    }
}

impl CompileReporter for PassContext<'_> {
    fn files_to_compile(&mut self, files: &[PathBuf]) {
        debug!(target = self.target, files = files.len(), "files to compile");
    }

    fn successfully_compiled(&mut self, files: &[PathBuf]) {
        info!(target = self.target, files = files.len(), "compiled");
    }
}
