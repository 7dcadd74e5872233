//! Group extraction: which package a source declares.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use parcel_common::GroupKey;
use regex::Regex;

use crate::error::BuildError;

/// The only source extension the builder compiles.
pub const SOURCE_EXTENSION: &str = "p";

/// Leading `package <name>;` declaration. Anything after the `;` is ignored.
static PACKAGE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*package\s+([^;]*);").expect("package pattern is valid"));

/// Returns `true` if `path` has exactly the compilable extension.
pub fn is_compilable(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

/// Extracts the declared group from source text.
///
/// Returns the default (empty) group when the text does not start with a
/// `package` declaration; that is never an error.
pub fn extract_group(content: &str) -> GroupKey {
    PACKAGE_DECL
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| GroupKey::new(m.as_str().trim()))
        .unwrap_or_default()
}

/// Reads `path` and extracts its declared group.
pub fn read_group(path: &Path) -> Result<GroupKey, BuildError> {
    let bytes = std::fs::read(path).map_err(|e| BuildError::io(path, e))?;
    Ok(extract_group(&String::from_utf8_lossy(&bytes)))
}

/// Per-pass memo of declared groups, so a file touched by both emission and
/// facade rescans is read once.
#[derive(Debug, Default)]
pub struct GroupCache {
    groups: HashMap<PathBuf, GroupKey>,
}

impl GroupCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the declared group of `path`, reading the file on first use.
    pub fn group_of(&mut self, path: &Path) -> Result<GroupKey, BuildError> {
        if let Some(group) = self.groups.get(path) {
            return Ok(group.clone());
        }
        let group = read_group(path)?;
        self.groups.insert(path.to_path_buf(), group.clone());
        Ok(group)
    }

    /// Number of files read so far.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no file has been read yet.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_declaration() {
        assert_eq!(extract_group("package x;"), GroupKey::from("x"));
    }

    #[test]
    fn dotted_declaration_with_whitespace() {
        assert_eq!(
            extract_group("  \n\tpackage   com.example ;  // trailing"),
            GroupKey::from("com.example")
        );
    }

    #[test]
    fn rest_of_file_ignored() {
        let src = "package x;\nclass body here; more;\n";
        assert_eq!(extract_group(src), GroupKey::from("x"));
    }

    #[test]
    fn missing_declaration_is_default() {
        assert!(extract_group("").is_default());
        assert!(extract_group("class A;").is_default());
        assert!(extract_group("// package x;\n").is_default());
    }

    #[test]
    fn keyword_is_case_sensitive() {
        assert!(extract_group("Package x;").is_default());
        assert!(extract_group("PACKAGE x;").is_default());
    }

    #[test]
    fn keyword_needs_separator_and_terminator() {
        assert!(extract_group("packagex;").is_default());
        assert!(extract_group("package x").is_default());
    }

    #[test]
    fn compilable_extension() {
        assert!(is_compilable(Path::new("src/a.p")));
        assert!(!is_compilable(Path::new("src/a.pp")));
        assert!(!is_compilable(Path::new("src/a.P")));
        assert!(!is_compilable(Path::new("src/a.txt")));
        assert!(!is_compilable(Path::new("src/p")));
    }

    #[test]
    fn read_group_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_group(&dir.path().join("gone.p")).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }

    #[test]
    fn cache_reads_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.p");
        std::fs::write(&path, "package x;").unwrap();

        let mut cache = GroupCache::new();
        assert_eq!(cache.group_of(&path).unwrap(), GroupKey::from("x"));

        // A later edit is not observed within the same pass.
        std::fs::write(&path, "package y;").unwrap();
        assert_eq!(cache.group_of(&path).unwrap(), GroupKey::from("x"));
        assert_eq!(cache.len(), 1);
    }
}
