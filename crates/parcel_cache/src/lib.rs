//! Host-side build state for incremental Parcel builds.
//!
//! Detects which sources changed since the last successful pass, keeps the
//! artifact graph and output registry the builder reports into, and drives
//! one [`parcel_build::PackageFacadeBuilder`] pass per target.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod graph;
pub mod hasher;
pub mod manifest;
pub mod outputs;
pub mod stores;

pub use cache::{BuildCache, TargetCache, TargetReport, TargetSources};
pub use error::CacheError;
pub use graph::{ArtifactGraph, ArtifactRecord};
pub use hasher::{ChangeSet, SourceHasher};
pub use manifest::SourceManifest;
pub use outputs::OutputRegistry;
pub use stores::TargetStores;
