//! Error types for host-side build state.

use std::path::PathBuf;

use parcel_build::BuildError;

/// Errors that can occur while loading, updating or saving build state.
///
/// Loading is fail-safe: a missing or unreadable manifest, graph or output
/// registry starts the target from scratch (a full rebuild) instead of
/// failing. Errors surface when sources cannot be read or state cannot be
/// written.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading sources or writing state files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A state file could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The build pass itself failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::io(
            "/proj/.parcel/targets/main/manifest.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("manifest.json"));
    }

    #[test]
    fn serialization_error_display() {
        let err = CacheError::Serialization {
            reason: "key must be a string".to_string(),
        };
        assert!(err.to_string().contains("key must be a string"));
    }

    #[test]
    fn build_error_is_transparent() {
        let err: CacheError = BuildError::InvalidUnit {
            reason: "bad magic bytes".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid compiled unit: bad magic bytes");
    }
}
