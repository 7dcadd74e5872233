//! Output registry: every artifact written, keyed by path, with the sources it
//! came from.
//!
//! The builder never deletes artifacts. Before each pass the host reclaims
//! every output produced from a changed or removed source. The pass writes
//! back the units and facades that still have live sources; a package that
//! lost its last member keeps no facade.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parcel_build::{BuildTarget, OutputConsumer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CacheError;
use crate::manifest::{load_json, save_json};

const OUTPUTS_FILE: &str = "outputs.json";

/// Output path → producing sources, persisted per target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRegistry {
    outputs: BTreeMap<PathBuf, Vec<PathBuf>>,
}

impl OutputRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the registry from `data_dir`, or `None` if missing or unreadable.
    pub fn load(data_dir: &Path) -> Option<Self> {
        load_json(&data_dir.join(OUTPUTS_FILE))
    }

    /// Saves the registry to `data_dir`.
    pub fn save(&self, data_dir: &Path) -> Result<(), CacheError> {
        save_json(&data_dir.join(OUTPUTS_FILE), self)
    }

    /// Sources recorded for `output`.
    pub fn sources_of(&self, output: &Path) -> Option<&[PathBuf]> {
        self.outputs.get(output).map(Vec::as_slice)
    }

    /// Deletes every output with at least one source in `stale` and
    /// unregisters it. Returns the deleted paths.
    ///
    /// An output that is already gone is unregistered without error.
    pub fn reclaim(&mut self, stale: &[PathBuf]) -> Result<Vec<PathBuf>, CacheError> {
        let doomed: Vec<PathBuf> = self
            .outputs
            .iter()
            .filter(|(_, sources)| sources.iter().any(|s| stale.contains(s)))
            .map(|(output, _)| output.clone())
            .collect();

        for output in &doomed {
            match std::fs::remove_file(output) {
                Ok(()) => debug!(output = %output.display(), "reclaimed stale output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::io(output, e)),
            }
            self.outputs.remove(output);
        }
        Ok(doomed)
    }

    /// Number of registered outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl OutputConsumer for OutputRegistry {
    fn register_output(&mut self, _target: &BuildTarget, output: &Path, sources: &[PathBuf]) {
        self.outputs.insert(output.to_path_buf(), sources.to_vec());
    }
}
