//! High-level operations.
//!
//! This module contains the implementation of pluginsync commands.

pub mod collect;
pub mod plan;
pub mod workspace;

pub use collect::{ManifestCollector, MANIFEST_FILE};
pub use plan::{plan, LocalManifest, NameMapper, Plan, PlanAction, PlanEntry};
pub use workspace::{merge, WorkspaceOutcome, WorkspaceResolver, WorkspaceSummary};
