//! Configuration file support for pluginsync.
//!
//! Two configuration file locations are read:
//! - Global: `~/.pluginsync/config.toml` - User-wide defaults
//! - Project: `.pluginsync/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::{RepositoryCoordinate, WorkspaceLayout, DEFAULT_REFERENCE};
use crate::resolver::DEFAULT_PER_PAGE;
use crate::sources::github::{DEFAULT_API_URL, DEFAULT_RAW_URL, DEFAULT_USER_AGENT};

/// Default upstream repository owner.
pub const DEFAULT_OWNER: &str = "backstage";

/// Default upstream repository name.
pub const DEFAULT_REPO: &str = "community-plugins";

/// Workspaces resolved when none are configured.
pub const DEFAULT_WORKSPACES: &[&str] = &[
    "tekton",
    "argocd",
    "quay",
    "multi-source-security-viewer",
];

/// Environment variable holding the API token.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// pluginsync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream repository settings
    pub upstream: UpstreamConfig,

    /// Network settings
    pub net: NetConfig,

    /// Local-to-upstream package name rewrites, applied in a single pass
    pub rename: Option<Vec<RenameRule>>,
}

/// Where to look upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,

    /// Branch, tag or sha history is read from
    pub reference: Option<String>,

    pub workspaces: Option<Vec<String>>,

    /// Path template of the version file, containing `{workspace}`
    pub version_file: Option<String>,

    /// Path template of the plugins directory, containing `{workspace}`
    pub plugins_dir: Option<String>,
}

/// Network settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    pub api_url: Option<String>,
    pub raw_url: Option<String>,

    /// Name of the environment variable holding the API token
    pub token_env: Option<String>,

    pub user_agent: Option<String>,

    /// Commits requested per history page
    pub per_page: Option<u32>,

    /// Request timeout in seconds. No timeout when unset.
    pub timeout: Option<u64>,
}

/// A regex rewrite from a local package name to its upstream name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl RenameRule {
    /// Create a rule.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        RenameRule {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// The rules used when none are configured.
    pub fn defaults() -> Vec<RenameRule> {
        vec![
            RenameRule::new("@tssc-plugins", "@backstage-community"),
            RenameRule::new("backstage-community-", ""),
        ]
    }

    /// Compile the pattern.
    pub fn compile(&self) -> Result<Regex> {
        Regex::new(&self.pattern)
            .with_context(|| format!("invalid rename pattern '{}'", self.pattern))
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let Config {
            upstream,
            net,
            rename,
        } = other;

        merge_opt(&mut self.upstream.owner, upstream.owner);
        merge_opt(&mut self.upstream.repo, upstream.repo);
        merge_opt(&mut self.upstream.reference, upstream.reference);
        merge_opt(&mut self.upstream.workspaces, upstream.workspaces);
        merge_opt(&mut self.upstream.version_file, upstream.version_file);
        merge_opt(&mut self.upstream.plugins_dir, upstream.plugins_dir);

        merge_opt(&mut self.net.api_url, net.api_url);
        merge_opt(&mut self.net.raw_url, net.raw_url);
        merge_opt(&mut self.net.token_env, net.token_env);
        merge_opt(&mut self.net.user_agent, net.user_agent);
        merge_opt(&mut self.net.per_page, net.per_page);
        merge_opt(&mut self.net.timeout, net.timeout);

        // rename lists replace each other whole
        merge_opt(&mut self.rename, rename);
    }

    /// The upstream repository.
    pub fn coordinate(&self) -> RepositoryCoordinate {
        RepositoryCoordinate::new(
            self.upstream.owner.as_deref().unwrap_or(DEFAULT_OWNER),
            self.upstream.repo.as_deref().unwrap_or(DEFAULT_REPO),
        )
    }

    /// The reference history is read from.
    pub fn reference(&self) -> &str {
        self.upstream.reference.as_deref().unwrap_or(DEFAULT_REFERENCE)
    }

    /// Workspaces to resolve, in merge order.
    pub fn workspaces(&self) -> Vec<String> {
        match &self.upstream.workspaces {
            Some(workspaces) => workspaces.clone(),
            None => DEFAULT_WORKSPACES.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Path templates.
    pub fn layout(&self) -> WorkspaceLayout {
        let mut layout = WorkspaceLayout::default();
        if let Some(version_file) = &self.upstream.version_file {
            layout.version_file = version_file.clone();
        }
        if let Some(plugins_dir) = &self.upstream.plugins_dir {
            layout.plugins_dir = plugins_dir.clone();
        }
        layout
    }

    pub fn api_url(&self) -> &str {
        self.net.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn raw_url(&self) -> &str {
        self.net.raw_url.as_deref().unwrap_or(DEFAULT_RAW_URL)
    }

    pub fn token_env(&self) -> &str {
        self.net.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV)
    }

    pub fn user_agent(&self) -> &str {
        self.net.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn per_page(&self) -> u32 {
        self.net.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.net.timeout.map(Duration::from_secs)
    }

    /// Rename rules, falling back to the built-in ones.
    pub fn rename_rules(&self) -> Vec<RenameRule> {
        self.rename.clone().unwrap_or_else(RenameRule::defaults)
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        self.layout().validate()?;

        if self.per_page() == 0 {
            bail!("net.per_page must be greater than 0");
        }

        for (key, value) in [("net.api_url", self.api_url()), ("net.raw_url", self.raw_url())] {
            Url::parse(value).with_context(|| format!("invalid {} '{}'", key, value))?;
        }

        for rule in self.rename_rules() {
            rule.compile()?;
        }

        if self.workspaces().iter().any(|w| w.trim().is_empty()) {
            bail!("upstream.workspaces contains an empty name");
        }

        Ok(())
    }
}

fn merge_opt<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Load configuration with proper precedence.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.pluginsync/config.toml)
/// 2. Global config (~/.pluginsync/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global pluginsync config directory (~/.pluginsync).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".pluginsync"))
}

/// Get the project config path (.pluginsync/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".pluginsync").join("config.toml")
}
