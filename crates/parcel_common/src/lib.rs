//! Shared foundational types used across the Parcel build tool.
//!
//! This crate provides content hashing for change detection and artifact
//! checksums, group-key and qualified-name helpers, and platform-independent
//! path normalization.

#![warn(missing_docs)]

pub mod hash;
pub mod names;
pub mod path;

pub use hash::ContentHash;
pub use names::{base_name, decapitalize, qualified_name, GroupKey};
pub use path::system_independent;
