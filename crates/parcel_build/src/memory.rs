//! In-memory host collaborators backing the builder's unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::context::{
    ArtifactMappings, BuildTarget, CompileReporter, DependencyRegistrar, OutputConsumer,
    StoreProvider,
};
use crate::error::BuildError;
use crate::membership::{MembershipStore, MemoryMembershipStore};

/// Records everything the builder reports, in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    /// Output file → (target name, sources).
    pub outputs: BTreeMap<PathBuf, (String, Vec<PathBuf>)>,
    /// Qualified unit name → (sources, bytes).
    pub artifacts: BTreeMap<String, (Vec<PathBuf>, Vec<u8>)>,
    /// Every `files_to_compile` report, in call order.
    pub compiled: Vec<Vec<PathBuf>>,
    /// Every `successfully_compiled` report, in call order.
    pub succeeded: Vec<Vec<PathBuf>>,
    /// Number of `record_artifact` calls.
    pub recorded: usize,
}

impl MemoryHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs registered with `source` among their sources.
    pub fn outputs_of(&self, source: &Path) -> Vec<PathBuf> {
        self.outputs
            .iter()
            .filter(|(_, (_, sources))| sources.iter().any(|s| s == source))
            .map(|(output, _)| output.clone())
            .collect()
    }

    /// Sources recorded for `qualified_name`.
    pub fn artifact_sources_of(&self, qualified_name: &str) -> Vec<PathBuf> {
        self.artifact_sources(qualified_name)
    }
}

impl OutputConsumer for MemoryHost {
    fn register_output(&mut self, target: &BuildTarget, output: &Path, sources: &[PathBuf]) {
        self.outputs.insert(
            output.to_path_buf(),
            (target.name.clone(), sources.to_vec()),
        );
    }
}

impl DependencyRegistrar for MemoryHost {
    fn record_artifact(&mut self, qualified_name: &str, sources: &[PathBuf], bytes: &[u8]) {
        self.recorded += 1;
        self.artifacts.insert(
            qualified_name.to_string(),
            (sources.to_vec(), bytes.to_vec()),
        );
    }
}

impl ArtifactMappings for MemoryHost {
    fn artifact_sources(&self, qualified_name: &str) -> Vec<PathBuf> {
        self.artifacts
            .get(qualified_name)
            .map(|(sources, _)| sources.clone())
            .unwrap_or_default()
    }
}

impl CompileReporter for MemoryHost {
    fn files_to_compile(&mut self, files: &[PathBuf]) {
        self.compiled.push(files.to_vec());
    }

    fn successfully_compiled(&mut self, files: &[PathBuf]) {
        self.succeeded.push(files.to_vec());
    }
}

/// One [`MemoryMembershipStore`] per target name.
#[derive(Debug, Default)]
pub struct MemoryStores {
    stores: BTreeMap<String, MemoryMembershipStore>,
}

impl MemoryStores {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// The store of `target`, if it was ever opened.
    pub fn get(&self, target: &str) -> Option<&MemoryMembershipStore> {
        self.stores.get(target)
    }
}

impl StoreProvider for MemoryStores {
    fn store(&mut self, target: &BuildTarget) -> Result<&mut dyn MembershipStore, BuildError> {
        Ok(self.stores.entry(target.name.clone()).or_default())
    }
}
