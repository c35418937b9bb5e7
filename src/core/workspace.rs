//! Workspace path layout within the upstream monorepo.
//!
//! Each upstream workspace keeps a version-declaration file and a plugins
//! directory at fixed locations. The layout holds the two path templates
//! and expands them for a named workspace.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the workspace name in path templates.
pub const WORKSPACE_PLACEHOLDER: &str = "{workspace}";

/// Path templates for workspaces in the upstream repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    /// Template for the version-declaration file
    #[serde(default = "default_version_file")]
    pub version_file: String,

    /// Template for the plugins directory
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: String,
}

fn default_version_file() -> String {
    "workspaces/{workspace}/backstage.json".to_string()
}

fn default_plugins_dir() -> String {
    "workspaces/{workspace}/plugins".to_string()
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        WorkspaceLayout {
            version_file: default_version_file(),
            plugins_dir: default_plugins_dir(),
        }
    }
}

impl WorkspaceLayout {
    /// Path of the version-declaration file for a workspace.
    pub fn version_file(&self, workspace: &str) -> String {
        self.version_file.replace(WORKSPACE_PLACEHOLDER, workspace)
    }

    /// Path of the plugins directory for a workspace.
    pub fn plugins_dir(&self, workspace: &str) -> String {
        self.plugins_dir.replace(WORKSPACE_PLACEHOLDER, workspace)
    }

    /// Validate that both templates depend on the workspace name.
    pub fn validate(&self) -> Result<()> {
        if !self.version_file.contains(WORKSPACE_PLACEHOLDER) {
            bail!(
                "version_file template '{}' does not contain {}",
                self.version_file,
                WORKSPACE_PLACEHOLDER
            );
        }
        if !self.plugins_dir.contains(WORKSPACE_PLACEHOLDER) {
            bail!(
                "plugins_dir template '{}' does not contain {}",
                self.plugins_dir,
                WORKSPACE_PLACEHOLDER
            );
        }
        Ok(())
    }
}
