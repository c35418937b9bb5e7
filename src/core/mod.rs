//! Core data types for upstream version resolution.

pub mod commit;
pub mod coordinate;
pub mod entry;
pub mod manifest;
pub mod probe;
pub mod workspace;

pub use commit::CommitMatch;
pub use coordinate::RepositoryCoordinate;
pub use entry::{DirectoryEntry, EntryKind};
pub use manifest::{ManifestRecord, WorkspacePackageIndex};
pub use probe::{MatchPolicy, VersionProbe, DEFAULT_REFERENCE};
pub use workspace::WorkspaceLayout;
