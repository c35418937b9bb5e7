//! Historical commit resolution.
//!
//! Finds the point in a repository's history at which a version-declaration
//! file held a requested version. The tip of the reference is checked first;
//! if it does not match, the file's commit history is walked newest first,
//! one page at a time, reading the file as it was at each commit.

pub mod commit;
pub mod errors;
pub mod history;

pub use commit::{declared_version, CommitResolver, Resolution, DEFAULT_PER_PAGE};
pub use errors::{ContentError, ResolveError};
pub use history::{HistoryScan, HistoryWalk, ObservedVersion, ObservedVersions};
