//! pluginsync - find plugin package versions at an upstream platform version
//!
//! This crate provides the library behind the `pluginsync` binary: locating
//! the commit at which an upstream workspace declared a given platform
//! version, and enumerating the plugin packages published there.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for pluginsync unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides in-memory implementations of the remote
/// repository and HTTP transport.
#[cfg(test)]
pub mod test_support;

pub use core::{
    CommitMatch, ManifestRecord, MatchPolicy, RepositoryCoordinate, VersionProbe,
    WorkspaceLayout, WorkspacePackageIndex,
};
pub use ops::{merge, WorkspaceOutcome, WorkspaceResolver};
pub use resolver::{CommitResolver, Resolution, ResolveError};
pub use sources::{GitHubRemote, RemoteRepository};
pub use util::context::GlobalContext;
