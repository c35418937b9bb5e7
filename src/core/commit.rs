//! A resolved point in repository history.

use serde::{Deserialize, Serialize};

/// The commit at which a version-declaration file held the requested version.
///
/// Produced once per resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMatch {
    commit_id: String,
    committed_at: Option<String>,
    message_summary: Option<String>,
    content_url: String,
}

impl CommitMatch {
    /// A match at the tip of a reference. No commit metadata is fetched for it.
    pub fn at_tip(reference: impl Into<String>, content_url: impl Into<String>) -> Self {
        CommitMatch {
            commit_id: reference.into(),
            committed_at: None,
            message_summary: None,
            content_url: content_url.into(),
        }
    }

    /// A match found while walking history.
    pub fn in_history(
        commit_id: impl Into<String>,
        committed_at: Option<String>,
        message_summary: Option<String>,
        content_url: impl Into<String>,
    ) -> Self {
        CommitMatch {
            commit_id: commit_id.into(),
            committed_at,
            message_summary,
            content_url: content_url.into(),
        }
    }

    /// Commit sha, or the reference name for a tip match.
    pub fn commit_id(&self) -> &str {
        &self.commit_id
    }

    /// ISO 8601 commit timestamp.
    pub fn committed_at(&self) -> Option<&str> {
        self.committed_at.as_deref()
    }

    /// First line of the commit message.
    pub fn message_summary(&self) -> Option<&str> {
        self.message_summary.as_deref()
    }

    /// Raw URL of the version-declaration file at this commit.
    pub fn content_url(&self) -> &str {
        &self.content_url
    }

    /// Whether this match is the tip of a reference rather than a historical commit.
    pub fn is_tip(&self) -> bool {
        self.committed_at.is_none() && self.message_summary.is_none()
    }
}
