//! Walking a file's commit history.
//!
//! [`HistoryWalk`] lazily pages through the commits that touched a file and
//! yields them one at a time, newest first. [`HistoryScan`] is the fold
//! accumulator the resolver carries over that sequence: the best match so
//! far and every version observed along the way.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::ops::ControlFlow;

use serde::Serialize;

use crate::core::{CommitMatch, MatchPolicy, RepositoryCoordinate};
use crate::sources::{CommitDescriptor, RemoteError, RemoteRepository};

/// Lazy, non-restartable iterator over a file's commit history.
///
/// Pages are requested only when the previous one is used up. The walk ends
/// at the first empty page; a failed page request is yielded once as an
/// error and ends the walk.
pub struct HistoryWalk<'a, R: RemoteRepository + ?Sized> {
    remote: &'a R,
    coord: &'a RepositoryCoordinate,
    reference: &'a str,
    path: &'a str,
    per_page: u32,
    next_page: u32,
    buffer: VecDeque<CommitDescriptor>,
    finished: bool,
}

impl<'a, R: RemoteRepository + ?Sized> HistoryWalk<'a, R> {
    /// Start a walk at page 1.
    pub fn new(
        remote: &'a R,
        coord: &'a RepositoryCoordinate,
        reference: &'a str,
        path: &'a str,
        per_page: u32,
    ) -> Self {
        HistoryWalk {
            remote,
            coord,
            reference,
            path,
            per_page,
            next_page: 1,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    /// Number of pages requested so far, including the terminating empty page.
    pub fn pages_requested(&self) -> u32 {
        self.next_page - 1
    }
}

impl<R: RemoteRepository + ?Sized> Iterator for HistoryWalk<'_, R> {
    type Item = Result<CommitDescriptor, RemoteError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(commit) = self.buffer.pop_front() {
                return Some(Ok(commit));
            }
            if self.finished {
                return None;
            }

            let page = self.next_page;
            self.next_page += 1;

            match self
                .remote
                .list_commits(self.coord, self.reference, self.path, self.per_page, page)
            {
                Ok(commits) if commits.is_empty() => {
                    tracing::debug!("history of {} exhausted after {} pages", self.path, page - 1);
                    self.finished = true;
                }
                Ok(commits) => {
                    tracing::debug!(
                        "history page {} of {}: {} commits",
                        page,
                        self.path,
                        commits.len()
                    );
                    self.buffer.extend(commits);
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<R: RemoteRepository + ?Sized> FusedIterator for HistoryWalk<'_, R> {}

/// Where a version was seen during a history walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedVersion {
    pub commit_id: String,
    pub url: String,
}

/// Every distinct version seen during a walk, with the newest commit that
/// declared it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ObservedVersions(BTreeMap<String, ObservedVersion>);

impl ObservedVersions {
    /// Record a version unless it was already seen at a newer commit.
    pub fn record(&mut self, version: &str, commit_id: &str, url: &str) {
        self.0
            .entry(version.to_string())
            .or_insert_with(|| ObservedVersion {
                commit_id: commit_id.to_string(),
                url: url.to_string(),
            });
    }

    /// Look up where a version was seen.
    pub fn get(&self, version: &str) -> Option<&ObservedVersion> {
        self.0.get(version)
    }

    /// Number of distinct versions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in version string order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ObservedVersion> {
        self.0.iter()
    }
}

/// A file read at one commit: the declared version and its raw URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredAt {
    pub version: String,
    pub url: String,
}

#[derive(Debug, Clone)]
struct Candidate {
    version: String,
    commit: CommitMatch,
}

/// Fold accumulator for a history walk.
#[derive(Debug, Clone)]
pub struct HistoryScan {
    policy: MatchPolicy,
    target: String,
    best: Option<Candidate>,
    observed: ObservedVersions,
}

impl HistoryScan {
    /// Start a scan for `target` under `policy`.
    pub fn new(policy: MatchPolicy, target: impl Into<String>) -> Self {
        HistoryScan {
            policy,
            target: target.into(),
            best: None,
            observed: ObservedVersions::default(),
        }
    }

    /// Fold one commit into the scan.
    ///
    /// `declared` is `None` when the file could not be read at that commit;
    /// such commits are skipped. Breaks with the match when the policy stops
    /// at the first qualifying commit.
    pub fn step(
        mut self,
        commit: &CommitDescriptor,
        declared: Option<DeclaredAt>,
    ) -> ControlFlow<CommitMatch, Self> {
        let Some(declared) = declared else {
            return ControlFlow::Continue(self);
        };

        self.observed.record(&declared.version, &commit.sha, &declared.url);

        if !self.policy.matches(&declared.version, &self.target) {
            return ControlFlow::Continue(self);
        }

        let found = CommitMatch::in_history(
            commit.sha.clone(),
            commit.date().map(str::to_string),
            commit.summary().map(str::to_string),
            declared.url,
        );

        if self.policy.stops_on_first_match() {
            return ControlFlow::Break(found);
        }

        let replace = match &self.best {
            None => true,
            Some(best) => self.policy.prefers(&declared.version, &best.version),
        };
        if replace {
            tracing::debug!(
                "best {} match so far: {} at {}",
                self.policy,
                declared.version,
                commit.sha
            );
            self.best = Some(Candidate {
                version: declared.version,
                commit: found,
            });
        }

        ControlFlow::Continue(self)
    }

    /// The best match, or everything observed when nothing qualified.
    pub fn finish(self) -> Result<(String, CommitMatch), ObservedVersions> {
        match self.best {
            Some(best) => Ok((best.version, best.commit)),
            None => Err(self.observed),
        }
    }

    /// Versions observed so far.
    pub fn observed(&self) -> &ObservedVersions {
        &self.observed
    }
}
