//! Package manifest records and per-workspace indexes.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

/// A package manifest discovered under a workspace's plugins directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    /// Package name from the manifest
    pub package_name: String,

    /// Package version from the manifest
    pub version: String,

    /// Path of the manifest within the repository
    pub source_path: String,

    /// Raw URL the manifest was read from
    pub retrieval_url: String,

    /// Workspace the manifest belongs to
    pub workspace: String,
}

/// Package name to manifest record, read at one fixed commit.
///
/// Only [`crate::ops::ManifestCollector`] builds these, so every record in an
/// index comes from the same commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspacePackageIndex {
    workspace: String,
    commit_id: Option<String>,
    packages: BTreeMap<String, ManifestRecord>,
}

impl WorkspacePackageIndex {
    /// An index with no packages and no commit.
    pub fn empty(workspace: impl Into<String>) -> Self {
        WorkspacePackageIndex {
            workspace: workspace.into(),
            commit_id: None,
            packages: BTreeMap::new(),
        }
    }

    pub(crate) fn at_commit(workspace: impl Into<String>, commit_id: impl Into<String>) -> Self {
        WorkspacePackageIndex {
            workspace: workspace.into(),
            commit_id: Some(commit_id.into()),
            packages: BTreeMap::new(),
        }
    }

    /// Record a manifest. A duplicate package name replaces the earlier record.
    pub(crate) fn insert(&mut self, record: ManifestRecord) -> Option<ManifestRecord> {
        self.packages.insert(record.package_name.clone(), record)
    }

    /// Workspace name.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Commit the manifests were read at, if any were read.
    pub fn commit_id(&self) -> Option<&str> {
        self.commit_id.as_deref()
    }

    /// Look up a package by name.
    pub fn get(&self, name: &str) -> Option<&ManifestRecord> {
        self.packages.get(name)
    }

    /// Number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if the index has no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate over packages in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ManifestRecord> {
        self.packages.iter()
    }

    /// Consume the index, yielding its name to record map.
    pub fn into_packages(self) -> BTreeMap<String, ManifestRecord> {
        self.packages
    }
}

impl IntoIterator for WorkspacePackageIndex {
    type Item = (String, ManifestRecord);
    type IntoIter = btree_map::IntoIter<String, ManifestRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, version: &str) -> ManifestRecord {
        ManifestRecord {
            package_name: name.to_string(),
            version: version.to_string(),
            source_path: format!("plugins/{}/package.json", name),
            retrieval_url: format!("https://example.com/{}", name),
            workspace: "tekton".to_string(),
        }
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let mut index = WorkspacePackageIndex::at_commit("tekton", "abc123");
        assert!(index.insert(record("a", "1.0.0")).is_none());
        let previous = index.insert(record("a", "2.0.0"));

        assert_eq!(previous.unwrap().version, "1.0.0");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a").unwrap().version, "2.0.0");
        assert_eq!(index.commit_id(), Some("abc123"));
    }

    #[test]
    fn test_empty_index() {
        let index = WorkspacePackageIndex::empty("quay");
        assert!(index.is_empty());
        assert_eq!(index.workspace(), "quay");
        assert!(index.commit_id().is_none());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(record("a", "1.0.0")).unwrap();
        assert_eq!(json["packageName"], "a");
        assert_eq!(json["retrievalUrl"], "https://example.com/a");
        assert_eq!(json["sourcePath"], "plugins/a/package.json");
    }
}
