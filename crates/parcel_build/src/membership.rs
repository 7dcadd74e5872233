//! The group membership store: source path → group it last belonged to.
//!
//! The store is the only way to learn the group of a source after it has been
//! deleted. Entries are written when a source is emitted and when it is found
//! as a live facade member; they are never deleted, only overwritten. A stale
//! entry can only add a candidate group to a later pass, which then finds no
//! live members and skips it.
//!
//! # Storage Layout
//!
//! ```text
//! {target_data_dir}/package-facade/
//! └── packages.json       # { "<normalized source path>": "<group>" }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parcel_common::{system_independent, GroupKey};
use tracing::debug;

use crate::error::BuildError;

/// Directory under the target data directory that holds the store.
pub const STORE_DIR: &str = "package-facade";

/// Store file name.
pub const STORE_FILE: &str = "packages.json";

/// Persistent mapping from source path to its last-known group.
///
/// Implementations normalize keys with [`system_independent`] so lookups do not
/// depend on the platform's separator.
pub trait MembershipStore {
    /// Returns the group recorded for `path`, if any.
    fn get(&self, path: &Path) -> Option<GroupKey>;

    /// Records `group` for `path`, replacing any previous entry.
    fn put(&mut self, path: &Path, group: &GroupKey);

    /// Persists pending writes. Called by the host at target teardown.
    fn flush(&mut self) -> Result<(), BuildError>;
}

/// A [`MembershipStore`] backed by a JSON file in the target data directory.
#[derive(Debug)]
pub struct FileMembershipStore {
    path: PathBuf,
    entries: BTreeMap<String, GroupKey>,
    dirty: bool,
}

impl FileMembershipStore {
    /// Returns the store file location for a target data directory.
    pub fn location(data_dir: &Path) -> PathBuf {
        data_dir.join(STORE_DIR).join(STORE_FILE)
    }

    /// Opens the store for `data_dir`.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file is
    /// an error: silently starting empty would forget the groups of sources
    /// deleted before this pass.
    pub fn open(data_dir: &Path) -> Result<Self, BuildError> {
        let path = Self::location(data_dir);
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| BuildError::Store {
                path: path.clone(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(BuildError::io(path, e)),
        };
        debug!(store = %path.display(), entries = entries.len(), "opened membership store");
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// Number of recorded sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no source has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MembershipStore for FileMembershipStore {
    fn get(&self, path: &Path) -> Option<GroupKey> {
        self.entries.get(&system_independent(path)).cloned()
    }

    fn put(&mut self, path: &Path, group: &GroupKey) {
        let key = system_independent(path);
        if self.entries.get(&key) != Some(group) {
            self.entries.insert(key, group.clone());
            self.dirty = true;
        }
    }

    /// Writes to a temp file and renames it over the store, so a crash leaves
    /// either the previous or the new contents.
    fn flush(&mut self) -> Result<(), BuildError> {
        if !self.dirty {
            return Ok(());
        }
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;

        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| BuildError::Store {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(|e| BuildError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| BuildError::io(&self.path, e))?;

        self.dirty = false;
        debug!(store = %self.path.display(), entries = self.entries.len(), "flushed membership store");
        Ok(())
    }
}

/// A [`MembershipStore`] that lives only in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryMembershipStore {
    entries: BTreeMap<String, GroupKey>,
}

impl MemoryMembershipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, keyed by normalized path.
    pub fn entries(&self) -> &BTreeMap<String, GroupKey> {
        &self.entries
    }
}

impl MembershipStore for MemoryMembershipStore {
    fn get(&self, path: &Path) -> Option<GroupKey> {
        self.entries.get(&system_independent(path)).cloned()
    }

    fn put(&mut self, path: &Path, group: &GroupKey) {
        self.entries.insert(system_independent(path), group.clone());
    }

    fn flush(&mut self) -> Result<(), BuildError> {
        Ok(())
    }
}
