//! Repository coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An `owner/repo` pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryCoordinate {
    owner: String,
    repo: String,
}

impl RepositoryCoordinate {
    /// Create a new coordinate.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepositoryCoordinate {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl fmt::Display for RepositoryCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
