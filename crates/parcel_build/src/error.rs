//! Error types for a build pass.

use std::path::PathBuf;

/// Errors that abort a build pass for the whole chunk.
///
/// A missing `package` declaration or a removed file without a membership
/// entry is not an error. Everything here leaves artifacts and the membership
/// store potentially out of step, so the caller must not persist host state
/// after receiving one.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A source could not be read, a directory could not be listed, or an
    /// artifact could not be written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The membership store could not be loaded or flushed.
    #[error("membership store {path}: {reason}")]
    Store {
        /// The store file.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A compiled unit could not be serialized.
    #[error("failed to encode unit: {reason}")]
    Encode {
        /// Description of the failure.
        reason: String,
    },

    /// Bytes handed to the unit decoder are not a valid compiled unit.
    #[error("invalid compiled unit: {reason}")]
    InvalidUnit {
        /// Description of what is wrong with the bytes.
        reason: String,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
