//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "parcel.toml";

/// Loads and validates `parcel.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
        path: config_path.clone(),
        source: e,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `parcel.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.targets.is_empty() {
        return Err(ConfigError::MissingField("targets".to_string()));
    }
    for (name, target) in &config.targets {
        if target.sources.is_empty() || target.sources.iter().any(String::is_empty) {
            return Err(ConfigError::MissingField(format!("targets.{name}.sources")));
        }
    }
    if config.build.cache_dir.is_empty() {
        return Err(ConfigError::Invalid {
            field: "build.cache_dir".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "demo"

[targets.main]
sources = "src"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "demo");
        assert_eq!(config.project.version, "0.1.0");
        assert_eq!(config.build.cache_dir, ".parcel");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "demo"
version = "1.2.0"
description = "facade demo"

[targets.main]
sources = ["src/main"]
output = "out/classes"

[targets.test]
sources = "src/test"

[build]
cache_dir = "build/.parcel"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.version, "1.2.0");
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.build.cache_dir, "build/.parcel");
    }

    #[test]
    fn missing_name_errors() {
        let toml = r#"
[project]
name = ""

[targets.main]
sources = "src"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "project.name"));
    }

    #[test]
    fn no_targets_errors() {
        let toml = r#"
[project]
name = "demo"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "targets"));
    }

    #[test]
    fn empty_sources_errors() {
        let toml = r#"
[project]
name = "demo"

[targets.main]
sources = []
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "targets.main.sources"));
    }

    #[test]
    fn empty_cache_dir_errors() {
        let toml = r#"
[project]
name = "demo"

[targets.main]
sources = "src"

[build]
cache_dir = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"demo\"\n\n[targets.main]\nsources = \"src\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "demo");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
