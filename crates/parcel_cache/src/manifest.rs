//! Per-target source manifest: the content hash of every source as of the last
//! successful pass.
//!
//! Stored as `manifest.json` in the target data directory. A manifest from a
//! different Parcel version is discarded, which makes every source dirty.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parcel_common::ContentHash;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Name of the manifest file within the target data directory.
const MANIFEST_FILE: &str = "manifest.json";

/// Content hashes of a target's sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceManifest {
    /// Parcel version that wrote the manifest.
    pub parcel_version: String,

    /// Source path → content hash at the last successful pass.
    pub files: BTreeMap<PathBuf, ContentHash>,
}

impl SourceManifest {
    /// Creates an empty manifest.
    pub fn new(parcel_version: &str) -> Self {
        Self {
            parcel_version: parcel_version.to_string(),
            files: BTreeMap::new(),
        }
    }

    /// Loads the manifest from `data_dir`, or `None` if it is missing or
    /// unreadable.
    pub fn load(data_dir: &Path) -> Option<Self> {
        load_json(&data_dir.join(MANIFEST_FILE))
    }

    /// Saves the manifest to `data_dir`.
    pub fn save(&self, data_dir: &Path) -> Result<(), CacheError> {
        save_json(&data_dir.join(MANIFEST_FILE), self)
    }

    /// Returns `true` if the manifest was written by `current_version`.
    pub fn is_compatible(&self, current_version: &str) -> bool {
        self.parcel_version == current_version
    }
}

/// Reads and parses a JSON state file, treating any failure as absence.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Writes a JSON state file, creating its directory.
///
/// Writes to a sibling temp file first and renames it into place.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| CacheError::Serialization {
        reason: e.to_string(),
    })?;
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, json).map_err(|e| CacheError::io(&temp_path, e))?;
    std::fs::rename(&temp_path, path).map_err(|e| CacheError::io(path, e))
}
