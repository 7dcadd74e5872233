//! Source discovery, hashing and change detection.
//!
//! Compares the current content hash of every file under a target's source
//! directories against the [`SourceManifest`] of the last successful pass.
//! Every regular file is tracked, not just `.p` sources; the builder filters
//! by extension itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parcel_common::ContentHash;
use rayon::prelude::*;

use crate::error::CacheError;
use crate::manifest::SourceManifest;

/// Result of comparing current source hashes against the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files not present in the manifest.
    pub new_files: Vec<PathBuf>,

    /// Files whose content hash differs from the manifest.
    pub modified_files: Vec<PathBuf>,

    /// Files in the manifest that no longer exist.
    pub deleted_files: Vec<PathBuf>,

    /// Files whose content hash matches the manifest.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if nothing was added, modified or deleted.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// New and modified files, in path order.
    pub fn dirty(&self) -> Vec<PathBuf> {
        let mut dirty: Vec<PathBuf> = self
            .new_files
            .iter()
            .chain(&self.modified_files)
            .cloned()
            .collect();
        dirty.sort();
        dirty
    }

    /// Number of files that need reprocessing (new + modified).
    pub fn dirty_count(&self) -> usize {
        self.new_files.len() + self.modified_files.len()
    }
}

/// Computes content hashes of source files and detects changes.
pub struct SourceHasher;

impl SourceHasher {
    /// Returns the XXH3-128 content hash of a single file.
    pub fn hash_file(path: &Path) -> Result<ContentHash, CacheError> {
        let content = std::fs::read(path).map_err(|e| CacheError::io(path, e))?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Hashes `paths` in parallel.
    ///
    /// Files that cannot be read are skipped; they then show up as deleted.
    pub fn hash_files(paths: &[PathBuf]) -> BTreeMap<PathBuf, ContentHash> {
        paths
            .par_iter()
            .filter_map(|path| Self::hash_file(path).ok().map(|h| (path.clone(), h)))
            .collect()
    }

    /// Lists every regular file under `source_dirs`, recursively, sorted.
    ///
    /// A source directory that does not exist contributes nothing.
    pub fn discover(source_dirs: &[PathBuf]) -> Result<Vec<PathBuf>, CacheError> {
        let mut files = Vec::new();
        for dir in source_dirs {
            if dir.is_dir() {
                walk_dir(dir, &mut files)?;
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Compares `current` hashes against `manifest`.
    pub fn detect_changes(
        current: &BTreeMap<PathBuf, ContentHash>,
        manifest: &SourceManifest,
    ) -> ChangeSet {
        let mut changes = ChangeSet::default();

        for (path, hash) in current {
            match manifest.files.get(path) {
                Some(previous) if previous == hash => changes.unchanged_files.push(path.clone()),
                Some(_) => changes.modified_files.push(path.clone()),
                None => changes.new_files.push(path.clone()),
            }
        }

        changes.deleted_files = manifest
            .files
            .keys()
            .filter(|p| !current.contains_key(*p))
            .cloned()
            .collect();

        changes
    }
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CacheError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CacheError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| CacheError::io(dir, e))?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_with(entries: &[(&str, &[u8])]) -> SourceManifest {
        let mut m = SourceManifest::new("0.1.0");
        for (path, content) in entries {
            m.files
                .insert(PathBuf::from(path), ContentHash::from_bytes(content));
        }
        m
    }

    #[test]
    fn hash_file_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.p");
        std::fs::write(&path, "package x;").unwrap();
        assert_eq!(
            SourceHasher::hash_file(&path).unwrap(),
            SourceHasher::hash_file(&path).unwrap()
        );
    }

    #[test]
    fn hash_file_missing_errors() {
        let err = SourceHasher::hash_file(Path::new("/nonexistent/a.p")).unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[test]
    fn hash_files_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.p");
        std::fs::write(&present, "package x;").unwrap();
        let hashes = SourceHasher::hash_files(&[present.clone(), dir.path().join("gone.p")]);
        assert_eq!(hashes.len(), 1);
        assert!(hashes.contains_key(&present));
    }

    #[test]
    fn discover_walks_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x").join("y");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a.p"), "").unwrap();
        std::fs::write(nested.join("b.p"), "").unwrap();
        std::fs::write(nested.join("notes.txt"), "").unwrap();

        let files = SourceHasher::discover(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn discover_skips_missing_dirs() {
        let files = SourceHasher::discover(&[PathBuf::from("/nonexistent/src")]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn detect_all_new() {
        let current = manifest_with(&[("a.p", b"a"), ("b.p", b"b")]).files;
        let changes = SourceHasher::detect_changes(&current, &SourceManifest::new("0.1.0"));
        assert_eq!(changes.new_files.len(), 2);
        assert_eq!(changes.dirty_count(), 2);
        assert!(!changes.is_empty());
    }

    #[test]
    fn detect_modified_deleted_unchanged() {
        let manifest = manifest_with(&[("a.p", b"a"), ("b.p", b"b"), ("c.p", b"c")]);
        let current = manifest_with(&[("a.p", b"a"), ("b.p", b"B"), ("d.p", b"d")]).files;

        let changes = SourceHasher::detect_changes(&current, &manifest);
        assert_eq!(changes.unchanged_files, vec![PathBuf::from("a.p")]);
        assert_eq!(changes.modified_files, vec![PathBuf::from("b.p")]);
        assert_eq!(changes.deleted_files, vec![PathBuf::from("c.p")]);
        assert_eq!(changes.new_files, vec![PathBuf::from("d.p")]);
        assert_eq!(
            changes.dirty(),
            vec![PathBuf::from("b.p"), PathBuf::from("d.p")]
        );
    }

    #[test]
    fn detect_no_changes() {
        let manifest = manifest_with(&[("a.p", b"a")]);
        let changes = SourceHasher::detect_changes(&manifest.files.clone(), &manifest);
        assert!(changes.is_empty());
        assert_eq!(changes.unchanged_files.len(), 1);
    }
}
