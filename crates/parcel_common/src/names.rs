//! Group keys and the naming rules for generated units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The package a source declares, e.g. `com.example`.
///
/// The empty key is the default group for sources without a `package`
/// declaration. It is a real group: undeclared sources are aggregated into
/// its facade like any other.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Creates a group key from a declared package name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the key as written in the declaration.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the default (undeclared) group.
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the relative directory for this group's artifacts (`a.b` → `a/b`).
    ///
    /// The default group maps to the empty path, i.e. the output root itself.
    pub fn as_path(&self) -> PathBuf {
        self.0.split('.').filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("<default>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl fmt::Debug for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupKey({:?})", self.0)
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GroupKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Joins a group and a short name into a dotted qualified name.
///
/// Members of the default group are qualified by their short name alone.
pub fn qualified_name(group: &GroupKey, name: &str) -> String {
    if group.is_default() {
        name.to_string()
    } else {
        format!("{}.{name}", group.as_str())
    }
}

/// Returns the file name of `path` without its last extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lowercases the first character of `name` unless the first two characters
/// are both uppercase (`Alpha` → `alpha`, `URL` → `URL`).
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if !first.is_uppercase() {
        return name.to_string();
    }
    if chars.next().is_some_and(char::is_uppercase) {
        return name.to_string();
    }
    let mut out: String = first.to_lowercase().collect();
    out.push_str(&name[first.len_utf8()..]);
    out
}
