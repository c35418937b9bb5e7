//! Per-workspace resolution: find the commit, then collect manifests there.
//!
//! Each workspace is an independent sequence of read-only remote calls, so
//! several workspaces can be resolved on the rayon pool at once. Within one
//! workspace everything is sequential.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::core::{
    CommitMatch, ManifestRecord, MatchPolicy, RepositoryCoordinate, VersionProbe,
    WorkspaceLayout, WorkspacePackageIndex, DEFAULT_REFERENCE,
};
use crate::ops::collect::ManifestCollector;
use crate::resolver::{CommitResolver, ObservedVersions, Resolution, ResolveError, DEFAULT_PER_PAGE};
use crate::sources::RemoteRepository;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Result of resolving one workspace.
#[derive(Debug)]
pub enum WorkspaceOutcome {
    /// A commit was found and its plugins enumerated (possibly none).
    Resolved {
        commit: CommitMatch,
        index: WorkspacePackageIndex,
    },

    /// No commit in history declared the target.
    NotFound { observed: ObservedVersions },

    /// A listing request failed.
    Failed(ResolveError),
}

impl WorkspaceOutcome {
    /// The resolved index, if any.
    pub fn index(&self) -> Option<&WorkspacePackageIndex> {
        match self {
            WorkspaceOutcome::Resolved { index, .. } => Some(index),
            _ => None,
        }
    }

    /// The packages this workspace contributes. Empty unless resolved.
    pub fn into_index(self, workspace: &str) -> WorkspacePackageIndex {
        match self {
            WorkspaceOutcome::Resolved { index, .. } => index,
            _ => WorkspacePackageIndex::empty(workspace),
        }
    }

    /// Check if the workspace resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self, WorkspaceOutcome::Resolved { .. })
    }

    /// Describe an unresolved outcome for the operator.
    pub fn to_diagnostic(&self, workspace: &str, probe: &VersionProbe) -> Option<Diagnostic> {
        match self {
            WorkspaceOutcome::Resolved { .. } => None,
            WorkspaceOutcome::NotFound { observed } => {
                let mut diag = Diagnostic::warning(format!(
                    "no commit found where {} has version={}",
                    probe.path, probe.target
                ))
                .with_context(format!("workspace: {}", workspace));

                if observed.is_empty() {
                    diag = diag.with_context("no readable versions in history");
                }
                for (version, seen) in observed.iter() {
                    diag = diag.with_context(format!(
                        "{} at {} ({})",
                        version, seen.commit_id, seen.url
                    ));
                }

                Some(
                    diag.with_suggestion(suggestions::CHECK_TARGET)
                        .with_suggestion(suggestions::TRY_FUZZY),
                )
            }
            WorkspaceOutcome::Failed(err) => {
                Some(err.to_diagnostic().with_context(format!("workspace: {}", workspace)))
            }
        }
    }
}

/// Summary row for one workspace, suitable for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceSummary {
    pub workspace: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitMatch>,
    pub packages: usize,
}

impl WorkspaceSummary {
    /// Summarize an outcome.
    pub fn new(workspace: &str, outcome: &WorkspaceOutcome) -> Self {
        let (status, commit, packages) = match outcome {
            WorkspaceOutcome::Resolved { commit, index } => {
                ("resolved", Some(commit.clone()), index.len())
            }
            WorkspaceOutcome::NotFound { .. } => ("not-found", None, 0),
            WorkspaceOutcome::Failed(_) => ("failed", None, 0),
        };
        WorkspaceSummary {
            workspace: workspace.to_string(),
            status,
            commit,
            packages,
        }
    }
}

/// Resolves workspaces of one upstream repository.
pub struct WorkspaceResolver<R> {
    remote: R,
    coordinate: RepositoryCoordinate,
    layout: WorkspaceLayout,
    policy: MatchPolicy,
    reference: String,
    per_page: u32,
}

impl<R: RemoteRepository> WorkspaceResolver<R> {
    /// Create a resolver with the default layout, exact matching and `main`.
    pub fn new(remote: R, coordinate: RepositoryCoordinate) -> Self {
        WorkspaceResolver {
            remote,
            coordinate,
            layout: WorkspaceLayout::default(),
            policy: MatchPolicy::default(),
            reference: DEFAULT_REFERENCE.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Use different path templates.
    pub fn with_layout(mut self, layout: WorkspaceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Use a different matching policy.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Search history from a different reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Set the history page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// The remote in use.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// The probe used for a workspace.
    pub fn probe(&self, workspace: &str, target: &str) -> VersionProbe {
        VersionProbe::new(self.layout.version_file(workspace), target)
            .with_reference(self.reference.clone())
    }

    /// Resolve a single workspace.
    pub fn resolve_workspace(&self, workspace: &str, target: &str) -> WorkspaceOutcome {
        let probe = self.probe(workspace, target);
        tracing::info!(
            "Resolving {} at {} ({} match on {})",
            workspace,
            target,
            self.policy,
            probe.reference
        );

        let resolver =
            CommitResolver::new(&self.remote, self.policy).with_per_page(self.per_page);
        let commit = match resolver.resolve(&self.coordinate, &probe) {
            Ok(Resolution::Found(commit)) => commit,
            Ok(Resolution::NotFound(observed)) => {
                tracing::warn!(
                    "No commit found where {} has version={} ({} versions seen)",
                    probe.path,
                    target,
                    observed.len()
                );
                return WorkspaceOutcome::NotFound { observed };
            }
            Err(err) => {
                tracing::warn!("{}: {}", workspace, err);
                return WorkspaceOutcome::Failed(err);
            }
        };

        tracing::info!(
            "{}: {} declared at {}{}",
            workspace,
            target,
            commit.commit_id(),
            commit
                .message_summary()
                .map(|m| format!(" ({})", m))
                .unwrap_or_default()
        );

        let plugins_dir = self.layout.plugins_dir(workspace);
        match ManifestCollector::new(&self.remote).collect(
            &self.coordinate,
            workspace,
            &plugins_dir,
            &commit,
        ) {
            Ok(index) => {
                tracing::info!("{}: {} packages in {}", workspace, index.len(), plugins_dir);
                WorkspaceOutcome::Resolved { commit, index }
            }
            Err(err) => {
                tracing::warn!("{}: {}", workspace, err);
                WorkspaceOutcome::Failed(ResolveError::from(err))
            }
        }
    }
}

impl<R: RemoteRepository + Sync> WorkspaceResolver<R> {
    /// Resolve several workspaces concurrently, preserving input order.
    pub fn resolve_all(
        &self,
        workspaces: &[String],
        target: &str,
    ) -> Vec<(String, WorkspaceOutcome)> {
        workspaces
            .par_iter()
            .map(|workspace| (workspace.clone(), self.resolve_workspace(workspace, target)))
            .collect()
    }
}

/// Merge workspace outcomes into one package lookup table.
///
/// Unresolved workspaces contribute nothing. When two workspaces publish the
/// same package name, the later workspace wins.
pub fn merge<'a, I>(outcomes: I) -> BTreeMap<String, ManifestRecord>
where
    I: IntoIterator<Item = &'a WorkspaceOutcome>,
{
    outcomes
        .into_iter()
        .filter_map(WorkspaceOutcome::index)
        .flat_map(|index| index.iter())
        .map(|(name, record)| (name.clone(), record.clone()))
        .collect()
}
