//! CommitResolver - find the commit where a file declared a version.

use std::ops::ControlFlow;

use serde_json::Value;

use crate::core::{CommitMatch, MatchPolicy, RepositoryCoordinate, VersionProbe};
use crate::resolver::errors::{ContentError, ResolveError};
use crate::resolver::history::{DeclaredAt, HistoryScan, HistoryWalk, ObservedVersions};
use crate::sources::RemoteRepository;

/// Commits requested per history page. GitHub caps `per_page` at 100.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Outcome of a resolution that reached the remote successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A qualifying commit was found.
    Found(CommitMatch),

    /// History was exhausted. Carries every version seen along the way.
    NotFound(ObservedVersions),
}

/// Extract the declared version from a version-declaration document.
///
/// A missing `version` field reads as `"undefined"`, which never equals a
/// real target. Non-string values are rendered as JSON text.
pub fn declared_version(document: &Value) -> String {
    match document.get("version") {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Resolves version probes against a remote repository's history.
pub struct CommitResolver<'a, R: RemoteRepository + ?Sized> {
    remote: &'a R,
    policy: MatchPolicy,
    per_page: u32,
}

impl<'a, R: RemoteRepository + ?Sized> CommitResolver<'a, R> {
    /// Create a resolver with the given matching policy.
    pub fn new(remote: &'a R, policy: MatchPolicy) -> Self {
        CommitResolver {
            remote,
            policy,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Set the history page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// The matching policy in use.
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Find the commit at which `probe.path` declared `probe.target`.
    ///
    /// The tip of `probe.reference` is checked first and returned without
    /// commit metadata when it matches. Otherwise the file's history is
    /// walked newest first. Commits whose file cannot be read or parsed are
    /// skipped. Only a failed commit-listing request is an error.
    pub fn resolve(
        &self,
        coord: &RepositoryCoordinate,
        probe: &VersionProbe,
    ) -> Result<Resolution, ResolveError> {
        match self.read_declared(coord, &probe.reference, &probe.path) {
            Ok(tip) if self.policy.matches(&tip.version, &probe.target) => {
                tracing::debug!(
                    "{} at {} already declares {}",
                    probe.path,
                    probe.reference,
                    tip.version
                );
                return Ok(Resolution::Found(CommitMatch::at_tip(
                    probe.reference.clone(),
                    tip.url,
                )));
            }
            Ok(tip) => {
                tracing::debug!(
                    "{} at {} declares {}, walking history for {}",
                    probe.path,
                    probe.reference,
                    tip.version,
                    probe.target
                );
            }
            Err(err) => {
                tracing::warn!(
                    "could not read {} at ref \"{}\": {}",
                    probe.path,
                    probe.reference,
                    err
                );
            }
        }

        let mut walk = HistoryWalk::new(
            self.remote,
            coord,
            &probe.reference,
            &probe.path,
            self.per_page,
        );
        let scan = HistoryScan::new(self.policy, probe.target.clone());

        let flow = walk.try_fold(scan, |scan, item| match item {
            Ok(commit) => {
                let declared = match self.read_declared(coord, &commit.sha, &probe.path) {
                    Ok(declared) => Some(declared),
                    Err(err) => {
                        tracing::debug!("skipping {}: {}", commit.sha, err);
                        None
                    }
                };
                match scan.step(&commit, declared) {
                    ControlFlow::Continue(scan) => ControlFlow::Continue(scan),
                    ControlFlow::Break(found) => ControlFlow::Break(Ok(found)),
                }
            }
            Err(err) => ControlFlow::Break(Err(err)),
        });

        match flow {
            ControlFlow::Break(Ok(found)) => Ok(Resolution::Found(found)),
            ControlFlow::Break(Err(err)) => Err(ResolveError::from(err)),
            ControlFlow::Continue(scan) => match scan.finish() {
                Ok((version, found)) => {
                    tracing::debug!(
                        "highest {} match for {}: {}",
                        self.policy,
                        probe.target,
                        version
                    );
                    Ok(Resolution::Found(found))
                }
                Err(observed) => Ok(Resolution::NotFound(observed)),
            },
        }
    }

    /// Read the declared version of `path` at a reference or sha.
    fn read_declared(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
    ) -> Result<DeclaredAt, ContentError> {
        let file = self.remote.fetch_raw(coord, reference, path)?;
        let document: Value =
            serde_json::from_str(&file.body).map_err(|e| ContentError::Malformed {
                url: file.url.clone(),
                message: e.to_string(),
            })?;

        Ok(DeclaredAt {
            version: declared_version(&document),
            url: file.url,
        })
    }
}
