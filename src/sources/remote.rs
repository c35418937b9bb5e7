//! RemoteRepository trait - the boundary to the hosted repository.

use serde::Deserialize;
use thiserror::Error;

use crate::core::{DirectoryEntry, RepositoryCoordinate};

/// Failure talking to the remote.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote answered with a non-2xx status.
    #[error("GitHub API error {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body was not the expected shape.
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl RemoteError {
    /// URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            RemoteError::Status { url, .. }
            | RemoteError::Transport { url, .. }
            | RemoteError::Decode { url, .. } => url,
        }
    }

    /// HTTP status, if the remote answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A commit as returned by the commit-listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitDescriptor {
    pub sha: String,
    #[serde(default)]
    pub commit: CommitDetail,
}

/// The `commit` object of a commit descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub committer: Option<Signature>,
    #[serde(default)]
    pub author: Option<Signature>,
}

/// Author or committer signature. Only the date is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub date: Option<String>,
}

impl CommitDescriptor {
    /// Create a descriptor with a committer date and message.
    pub fn new(sha: impl Into<String>, date: Option<&str>, message: Option<&str>) -> Self {
        CommitDescriptor {
            sha: sha.into(),
            commit: CommitDetail {
                message: message.map(str::to_string),
                committer: date.map(|d| Signature {
                    date: Some(d.to_string()),
                }),
                author: None,
            },
        }
    }

    /// Committer date, falling back to the author date.
    pub fn date(&self) -> Option<&str> {
        let committer = self.commit.committer.as_ref().and_then(|s| s.date.as_deref());
        committer.or_else(|| self.commit.author.as_ref().and_then(|s| s.date.as_deref()))
    }

    /// First line of the commit message.
    pub fn summary(&self) -> Option<&str> {
        self.commit
            .message
            .as_deref()
            .map(|m| m.lines().next().unwrap_or(""))
    }
}

/// Raw file content and the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub url: String,
    pub body: String,
}

/// Read-only access to a hosted repository.
///
/// Implementations are shared between threads when several workspaces are
/// resolved at once, so they must not rely on `&mut self`.
pub trait RemoteRepository {
    /// List commits reachable from `reference` that touched `path`, newest
    /// first. `page` is 1-based. An empty page means history is exhausted.
    fn list_commits(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<CommitDescriptor>, RemoteError>;

    /// Fetch a file's raw content at a reference or sha.
    fn fetch_raw(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
    ) -> Result<RawFile, RemoteError>;

    /// List the immediate entries of a directory at a reference or sha.
    fn list_directory(
        &self,
        coord: &RepositoryCoordinate,
        path: &str,
        reference: &str,
    ) -> Result<Vec<DirectoryEntry>, RemoteError>;
}

impl<R: RemoteRepository + ?Sized> RemoteRepository for &R {
    fn list_commits(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<CommitDescriptor>, RemoteError> {
        (**self).list_commits(coord, reference, path, per_page, page)
    }

    fn fetch_raw(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
    ) -> Result<RawFile, RemoteError> {
        (**self).fetch_raw(coord, reference, path)
    }

    fn list_directory(
        &self,
        coord: &RepositoryCoordinate,
        path: &str,
        reference: &str,
    ) -> Result<Vec<DirectoryEntry>, RemoteError> {
        (**self).list_directory(coord, path, reference)
    }
}
