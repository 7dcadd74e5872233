//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a `parcel.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The configuration file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A referenced target name does not exist in the configuration.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field has a value that cannot be used.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}
