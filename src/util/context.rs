//! Global context for pluginsync operations.
//!
//! Provides centralized access to paths and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_dir, load_config, project_config_path, Config};

/// Paths and environment shared by a single invocation.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global pluginsync data (~/.pluginsync/)
    home: PathBuf,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".pluginsync"));

        Ok(GlobalContext {
            cwd,
            home,
            color: true,
        })
    }

    /// Create a GlobalContext with explicit directories.
    pub fn with_dirs(cwd: PathBuf, home: PathBuf) -> Self {
        GlobalContext {
            cwd,
            home,
            color: true,
        }
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the pluginsync home directory (~/.pluginsync/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        project_config_path(&self.cwd)
    }

    /// Load the merged global and project configuration.
    ///
    /// A project config that exists but does not parse is an error here,
    /// unlike the global one which falls back to defaults.
    pub fn load_config(&self) -> Result<Config> {
        let project = self.project_config_path();
        if project.exists() {
            Config::load(&project)?;
        }
        Ok(load_config(&self.config_path(), &project))
    }

    /// Read the API token named by the config, ignoring blank values.
    pub fn github_token(&self, config: &Config) -> Option<String> {
        std::env::var(config.token_env())
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let ctx = GlobalContext::with_dirs(
            PathBuf::from("/work"),
            PathBuf::from("/home/u/.pluginsync"),
        );
        assert_eq!(ctx.config_path(), PathBuf::from("/home/u/.pluginsync/config.toml"));
        assert_eq!(ctx.project_config_path(), PathBuf::from("/work/.pluginsync/config.toml"));
    }

    #[test]
    fn test_load_config_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let cwd = tmp.path().join("project");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(cwd.join(".pluginsync")).unwrap();

        std::fs::write(home.join("config.toml"), "[upstream]\nreference = \"global\"\n").unwrap();
        std::fs::write(
            cwd.join(".pluginsync/config.toml"),
            "[upstream]\nreference = \"project\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_dirs(cwd, home);
        let config = ctx.load_config().unwrap();
        assert_eq!(config.reference(), "project");
    }

    #[test]
    fn test_load_config_rejects_broken_project_config() {
        let tmp = TempDir::new().unwrap();
        let cwd = tmp.path().to_path_buf();
        std::fs::create_dir_all(cwd.join(".pluginsync")).unwrap();
        std::fs::write(
            cwd.join(".pluginsync/config.toml"),
            "[net]\nper_page = \"many\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_dirs(cwd, tmp.path().join("home"));
        assert!(ctx.load_config().is_err());
    }

    #[test]
    fn test_github_token_uses_configured_env() {
        let mut config = Config::default();
        config.net.token_env = Some("PLUGINSYNC_TEST_TOKEN_UNSET_VAR".to_string());

        let ctx = GlobalContext::with_dirs(PathBuf::from("."), PathBuf::from("."));
        assert!(ctx.github_token(&config).is_none());
    }
}
