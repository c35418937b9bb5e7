//! ManifestCollector - enumerate plugin manifests at a fixed commit.

use serde_json::Value;

use crate::core::{CommitMatch, ManifestRecord, RepositoryCoordinate, WorkspacePackageIndex};
use crate::resolver::ContentError;
use crate::sources::{RemoteError, RemoteRepository};

/// File name of a package manifest inside a plugin directory.
pub const MANIFEST_FILE: &str = "package.json";

/// Reads the package manifests one level below a plugins directory.
pub struct ManifestCollector<'a, R: RemoteRepository + ?Sized> {
    remote: &'a R,
}

impl<'a, R: RemoteRepository + ?Sized> ManifestCollector<'a, R> {
    /// Create a collector.
    pub fn new(remote: &'a R) -> Self {
        ManifestCollector { remote }
    }

    /// Build the package index of `plugins_dir` as of `commit`.
    ///
    /// Non-directory entries are ignored. A plugin directory whose
    /// `package.json` is missing or unparsable is skipped. Only a failed
    /// directory listing is an error.
    pub fn collect(
        &self,
        coord: &RepositoryCoordinate,
        workspace: &str,
        plugins_dir: &str,
        commit: &CommitMatch,
    ) -> Result<WorkspacePackageIndex, RemoteError> {
        let reference = commit.commit_id();
        let entries = self.remote.list_directory(coord, plugins_dir, reference)?;
        let mut index = WorkspacePackageIndex::at_commit(workspace, reference);

        for entry in entries.iter().filter(|e| e.is_dir()) {
            let manifest_path = format!("{}/{}", entry.path.trim_end_matches('/'), MANIFEST_FILE);

            match self.read_manifest(coord, reference, &manifest_path, workspace) {
                Ok(record) => {
                    tracing::debug!(
                        "{}: {}@{} from {}",
                        workspace,
                        record.package_name,
                        record.version,
                        manifest_path
                    );
                    if let Some(previous) = index.insert(record) {
                        tracing::debug!(
                            "{}: {} listed twice, replacing {}",
                            workspace,
                            previous.package_name,
                            previous.source_path
                        );
                    }
                }
                Err(err) => {
                    tracing::debug!("{}: skipping {}: {}", workspace, entry.path, err);
                }
            }
        }

        Ok(index)
    }

    fn read_manifest(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
        workspace: &str,
    ) -> Result<ManifestRecord, ContentError> {
        let file = self.remote.fetch_raw(coord, reference, path)?;
        let malformed = |message: &str| ContentError::Malformed {
            url: file.url.clone(),
            message: message.to_string(),
        };

        let document: Value =
            serde_json::from_str(&file.body).map_err(|e| malformed(&e.to_string()))?;
        let name = document
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing string field `name`"))?;
        let version = document
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing string field `version`"))?;

        Ok(ManifestRecord {
            package_name: name.to_string(),
            version: version.to_string(),
            source_path: path.to_string(),
            retrieval_url: file.url.clone(),
            workspace: workspace.to_string(),
        })
    }
}
