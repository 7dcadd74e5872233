//! Parsing and validation of `parcel.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`], and resolves its targets into absolute source, output and
//! data directories.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{cache_dir, resolve_target, resolve_targets, ResolvedTarget};
pub use types::*;
