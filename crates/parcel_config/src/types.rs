//! Configuration types deserialized from `parcel.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Cache directory used when `[build] cache_dir` is not set.
pub const DEFAULT_CACHE_DIR: &str = ".parcel";

/// The top-level project configuration parsed from `parcel.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// Named build targets (e.g., "main", "test").
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
    /// Build settings shared by all targets.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// One build target: its source roots and output directory.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Source roots relative to the project root.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(deserialize_with = "deserialize_string_or_vec")]
    pub sources: Vec<String>,
    /// Output directory relative to the project root; `out/<target>` if unset.
    #[serde(default)]
    pub output: Option<String>,
}

/// Build settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Directory for manifests, dependency graphs and membership stores,
    /// relative to the project root.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows both `sources = "src"` and `sources = ["src", "generated"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
