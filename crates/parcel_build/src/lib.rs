//! Incremental package-facade builder.
//!
//! Compiles every `.p` source into a compiled unit and keeps, for each declared
//! package, a `PackageFacade` unit with one field per live member. The builder
//! is driven by a host through the traits in [`context`]; it decides which
//! facades a pass must regenerate from the dirty set, the removed set and the
//! [`membership`] store, which remembers the package of every source so that
//! deleted sources still invalidate the right facade.

#![warn(missing_docs)]

pub mod builder;
pub mod context;
pub mod dirty;
pub mod emit;
pub mod error;
pub mod facade;
pub mod group;
pub mod membership;
#[cfg(test)]
mod memory;
pub mod unit;

pub use builder::{BuildSummary, ExitCode, PackageFacadeBuilder};
pub use context::{
    ArtifactMappings, BuildTarget, CompileContext, CompileReporter, DependencyRegistrar,
    DirtyFilesHolder, DirtySet, OutputConsumer, StoreProvider,
};
pub use emit::{artifact_path, Artifact, ARTIFACT_EXTENSION, FACADE_NAME};
pub use error::BuildError;
pub use group::{extract_group, is_compilable, read_group, GroupCache, SOURCE_EXTENSION};
pub use membership::{FileMembershipStore, MembershipStore, MemoryMembershipStore};
pub use unit::{CompiledUnit, FieldDecl};
