//! Shared helpers for CLI commands: project root resolution and target
//! loading.

use std::path::{Path, PathBuf};

use parcel_build::BuildTarget;
use parcel_cache::TargetSources;
use parcel_config::{ProjectConfig, ResolvedTarget, CONFIG_FILE};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `parcel.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `parcel.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// A loaded project with its selected targets.
pub struct Project {
    /// Parsed `parcel.toml`.
    pub config: ProjectConfig,
    /// Selected targets, in name order when none were named.
    pub targets: Vec<TargetSources>,
}

/// Finds the project, loads its config and resolves `names` (all targets
/// when empty).
pub fn load_project(
    global: &GlobalArgs,
    names: &[String],
) -> Result<Project, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = parcel_config::load_config(&project_dir)?;
    let targets = parcel_config::resolve_targets(&config, &project_dir, names)?
        .into_iter()
        .map(target_sources)
        .collect();
    Ok(Project { config, targets })
}

/// Converts a resolved config target into the host's build input.
pub fn target_sources(resolved: ResolvedTarget) -> TargetSources {
    TargetSources {
        target: BuildTarget::new(resolved.name, &resolved.output_dir, &resolved.data_dir),
        source_dirs: resolved.source_dirs,
    }
}
