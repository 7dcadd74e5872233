//! The artifact graph: which sources produced each compiled unit.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parcel_build::{ArtifactMappings, DependencyRegistrar};
use parcel_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::manifest::{load_json, save_json};

const GRAPH_FILE: &str = "graph.json";

/// One recorded unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Sources the unit was produced from.
    pub sources: Vec<PathBuf>,
    /// Hash of the unit bytes as last written.
    pub checksum: ContentHash,
}

/// Qualified unit name → [`ArtifactRecord`], persisted per target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactGraph {
    records: BTreeMap<String, ArtifactRecord>,
}

impl ArtifactGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the graph from `data_dir`, or `None` if missing or unreadable.
    pub fn load(data_dir: &Path) -> Option<Self> {
        load_json(&data_dir.join(GRAPH_FILE))
    }

    /// Saves the graph to `data_dir`.
    pub fn save(&self, data_dir: &Path) -> Result<(), CacheError> {
        save_json(&data_dir.join(GRAPH_FILE), self)
    }

    /// Returns the record for `qualified_name`.
    pub fn get(&self, qualified_name: &str) -> Option<&ArtifactRecord> {
        self.records.get(qualified_name)
    }

    /// Drops every record whose sources all lie in `stale`.
    pub fn forget_sources(&mut self, stale: &[PathBuf]) {
        self.records
            .retain(|_, r| !r.sources.iter().all(|s| stale.contains(s)));
    }

    /// Number of recorded units.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no unit is recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DependencyRegistrar for ArtifactGraph {
    fn record_artifact(&mut self, qualified_name: &str, sources: &[PathBuf], bytes: &[u8]) {
        self.records.insert(
            qualified_name.to_string(),
            ArtifactRecord {
                sources: sources.to_vec(),
                checksum: ContentHash::from_bytes(bytes),
            },
        );
    }
}

impl ArtifactMappings for ArtifactGraph {
    fn artifact_sources(&self, qualified_name: &str) -> Vec<PathBuf> {
        self.records
            .get(qualified_name)
            .map(|r| r.sources.clone())
            .unwrap_or_default()
    }
}
