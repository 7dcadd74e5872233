//! Conformance test helpers for Parcel incremental builds.
//!
//! [`Project`] is a throwaway project on disk: tests write and delete `.p`
//! sources, run passes through the real host ([`parcel_cache::BuildCache`])
//! and inspect the units and membership store that result.

#![warn(missing_docs)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parcel_build::{artifact_path, BuildTarget, CompiledUnit, FileMembershipStore, FACADE_NAME};
use parcel_cache::{BuildCache, TargetReport, TargetSources};
use parcel_common::{system_independent, GroupKey};
use tempfile::TempDir;

/// Version string the harness builds with.
pub const VERSION: &str = "0.1.0";

/// Single-target configuration with sources under `src/`.
pub const DEFAULT_CONFIG: &str = r#"
[project]
name = "conformance"

[targets.main]
sources = "src"
"#;

/// Source text declaring `group`, or no declaration for `""`.
pub fn package(group: &str) -> String {
    if group.is_empty() {
        "// no package declaration\n".to_string()
    } else {
        format!("package {group};\n")
    }
}

/// A project in a temporary directory.
pub struct Project {
    dir: TempDir,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// Creates a project with [`DEFAULT_CONFIG`].
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CONFIG)
    }

    /// Creates a project with the given `parcel.toml` contents.
    pub fn with_config(config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(parcel_config::CONFIG_FILE), config).unwrap();
        Self { dir }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `rel` (relative to the root), creating directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Deletes `rel`.
    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.root().join(rel)).unwrap();
    }

    /// Resolves the targets named (all when empty).
    pub fn targets(&self, names: &[&str]) -> Vec<TargetSources> {
        let config = parcel_config::load_config(self.root()).unwrap();
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        parcel_config::resolve_targets(&config, self.root(), &names)
            .unwrap()
            .into_iter()
            .map(|t| TargetSources {
                target: BuildTarget::new(t.name, &t.output_dir, &t.data_dir),
                source_dirs: t.source_dirs,
            })
            .collect()
    }

    /// Runs one pass over every target.
    pub fn build(&self) -> Vec<TargetReport> {
        BuildCache::new(VERSION).build(&self.targets(&[])).unwrap()
    }

    /// Runs one pass over `target` alone.
    pub fn build_target(&self, target: &str) -> TargetReport {
        BuildCache::new(VERSION)
            .build(&self.targets(&[target]))
            .unwrap()
            .remove(0)
    }

    /// Output directory of `target`.
    pub fn output_dir(&self, target: &str) -> PathBuf {
        self.targets(&[target]).remove(0).target.output_dir
    }

    /// Path of the unit `name` of `group` in `target`.
    pub fn unit_path(&self, target: &str, group: &str, name: &str) -> PathBuf {
        let sources = self.targets(&[target]).remove(0);
        artifact_path(&sources.target, &GroupKey::new(group), name)
    }

    /// Decodes the unit `name` of `group`, if it exists.
    pub fn unit(&self, target: &str, group: &str, name: &str) -> Option<CompiledUnit> {
        let bytes = std::fs::read(self.unit_path(target, group, name)).ok()?;
        Some(CompiledUnit::from_bytes(&bytes).unwrap())
    }

    /// Decodes the facade of `group`, if it exists.
    pub fn facade(&self, target: &str, group: &str) -> Option<CompiledUnit> {
        self.unit(target, group, FACADE_NAME)
    }

    /// Field type names of the facade of `group`, in order. Empty if there is
    /// no facade.
    pub fn facade_members(&self, target: &str, group: &str) -> Vec<String> {
        self.facade(target, group)
            .map(|unit| unit.fields.into_iter().map(|f| f.type_name).collect())
            .unwrap_or_default()
    }

    /// Contents of the membership store of `target`.
    pub fn store(&self, target: &str) -> BTreeMap<String, GroupKey> {
        let data_dir = self.targets(&[target]).remove(0).target.data_dir;
        match std::fs::read_to_string(FileMembershipStore::location(&data_dir)) {
            Ok(content) => serde_json::from_str(&content).unwrap(),
            Err(_) => BTreeMap::new(),
        }
    }

    /// Every file under the output directory of `target` with its bytes.
    pub fn snapshot(&self, target: &str) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(&self.output_dir(target), &mut files);
        files
    }

    /// Every file under the output directory of `target`, keyed by its
    /// `/`-separated path relative to that directory.
    pub fn outputs(&self, target: &str) -> BTreeMap<String, Vec<u8>> {
        let out = self.output_dir(target);
        self.snapshot(target)
            .into_iter()
            .map(|(path, bytes)| {
                let rel = path.strip_prefix(&out).unwrap().to_path_buf();
                (system_independent(&rel), bytes)
            })
            .collect()
    }
}

fn collect(dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
        } else {
            let bytes = std::fs::read(&path).unwrap();
            out.insert(path, bytes);
        }
    }
}
