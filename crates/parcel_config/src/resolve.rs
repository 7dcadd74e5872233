//! Target resolution: turning configured relative paths into absolute ones.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// A target with every directory resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// The target name.
    pub name: String,
    /// Source roots, scanned recursively by the host.
    pub source_dirs: Vec<PathBuf>,
    /// Where generated units go.
    pub output_dir: PathBuf,
    /// Private state of the target (`<cache_dir>/targets/<name>`).
    pub data_dir: PathBuf,
}

/// Returns the absolute cache directory of the project.
pub fn cache_dir(config: &ProjectConfig, project_dir: &Path) -> PathBuf {
    project_dir.join(&config.build.cache_dir)
}

/// Resolves a named target.
///
/// The output directory defaults to `out/<name>` under the project root.
pub fn resolve_target(
    config: &ProjectConfig,
    project_dir: &Path,
    target_name: &str,
) -> Result<ResolvedTarget, ConfigError> {
    let target = config
        .targets
        .get(target_name)
        .ok_or_else(|| ConfigError::UnknownTarget(target_name.to_string()))?;

    let output_dir = match &target.output {
        Some(output) => project_dir.join(output),
        None => project_dir.join("out").join(target_name),
    };

    Ok(ResolvedTarget {
        name: target_name.to_string(),
        source_dirs: target.sources.iter().map(|s| project_dir.join(s)).collect(),
        output_dir,
        data_dir: cache_dir(config, project_dir)
            .join("targets")
            .join(target_name),
    })
}

/// Resolves the named targets, or every target when `names` is empty.
pub fn resolve_targets(
    config: &ProjectConfig,
    project_dir: &Path,
    names: &[String],
) -> Result<Vec<ResolvedTarget>, ConfigError> {
    if names.is_empty() {
        config
            .targets
            .keys()
            .map(|name| resolve_target(config, project_dir, name))
            .collect()
    } else {
        names
            .iter()
            .map(|name| resolve_target(config, project_dir, name))
            .collect()
    }
}
