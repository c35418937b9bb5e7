//! Compare local plugin packages against resolved upstream versions.
//!
//! This is a report only. Nothing on disk is modified.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::ManifestRecord;
use crate::ops::collect::MANIFEST_FILE;
use crate::util::config::RenameRule;
use crate::util::fs::{find_files_named, read_to_string, DEFAULT_IGNORED_DIRS};

/// How deep below the local root manifests are looked for.
pub const MAX_LOCAL_DEPTH: usize = 4;

/// Maps a local package name to its upstream name.
///
/// All rules are combined into one alternation and applied in a single
/// global pass, so text produced by one rule is never rewritten by another.
/// Where two rules match at the same position the earlier rule wins.
/// Replacements are literal.
#[derive(Debug, Clone)]
pub struct NameMapper {
    combined: Option<Regex>,
    rules: Vec<(String, String)>,
}

impl NameMapper {
    /// Compile rename rules.
    pub fn new(rules: &[RenameRule]) -> Result<Self> {
        if rules.is_empty() {
            return Ok(NameMapper::identity());
        }

        let mut alternatives = Vec::with_capacity(rules.len());
        let mut named = Vec::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            rule.compile()?;
            let group = format!("rule{}", i);
            alternatives.push(format!("(?P<{}>{})", group, rule.pattern));
            named.push((group, rule.replacement.clone()));
        }

        let combined = Regex::new(&alternatives.join("|"))
            .context("failed to combine rename patterns")?;
        Ok(NameMapper {
            combined: Some(combined),
            rules: named,
        })
    }

    /// A mapper that leaves names unchanged.
    pub fn identity() -> Self {
        NameMapper {
            combined: None,
            rules: Vec::new(),
        }
    }

    /// Rewrite every match in a name.
    pub fn map(&self, name: &str) -> String {
        let Some(combined) = &self.combined else {
            return name.to_string();
        };

        combined
            .replace_all(name, |caps: &Captures<'_>| {
                self.rules
                    .iter()
                    .find(|(group, _)| caps.name(group).is_some())
                    .map(|(_, replacement)| replacement.clone())
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

/// A package manifest found on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalManifest {
    #[serde(skip)]
    pub path: PathBuf,
    pub name: String,
    pub version: String,
}

impl LocalManifest {
    /// Read name and version from a `package.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        let mut manifest: LocalManifest = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;
        manifest.path = path.to_path_buf();
        Ok(manifest)
    }
}

/// What would happen to a local package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    /// Upstream is newer.
    Bump,
    UpToDate,
    /// Local is newer than upstream.
    Ahead,
}

impl PlanAction {
    /// Decide from two version strings.
    ///
    /// Uses semver ordering when both sides parse, otherwise any difference
    /// counts as a bump.
    pub fn between(local: &str, upstream: &str) -> Self {
        match (Version::parse(local), Version::parse(upstream)) {
            (Ok(local), Ok(upstream)) => match local.cmp(&upstream) {
                Ordering::Less => PlanAction::Bump,
                Ordering::Equal => PlanAction::UpToDate,
                Ordering::Greater => PlanAction::Ahead,
            },
            _ if local == upstream => PlanAction::UpToDate,
            _ => PlanAction::Bump,
        }
    }
}

/// One local package matched to an upstream package.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub path: PathBuf,
    pub local_name: String,
    pub upstream_name: String,
    pub local_version: String,
    pub upstream_version: String,
    pub workspace: String,
    pub action: PlanAction,
}

/// The full report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan {
    /// Number of local manifests read.
    pub scanned: usize,
    /// Local packages with no upstream counterpart.
    pub unmatched: Vec<String>,
    pub entries: Vec<PlanEntry>,
}

impl Plan {
    /// Entries that would be bumped.
    pub fn bumps(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|e| e.action == PlanAction::Bump)
    }
}

/// Build a plan for every local package below `local_root`.
pub fn plan(
    local_root: &Path,
    upstream: &BTreeMap<String, ManifestRecord>,
    mapper: &NameMapper,
) -> Result<Plan> {
    let files = find_files_named(local_root, MANIFEST_FILE, MAX_LOCAL_DEPTH, DEFAULT_IGNORED_DIRS)?;
    tracing::info!("Found {} {} files in {}", files.len(), MANIFEST_FILE, local_root.display());

    let mut report = Plan::default();
    for path in files {
        let local = match LocalManifest::load(&path) {
            Ok(local) => local,
            Err(err) => {
                tracing::warn!("Skipping {}: {:#}", path.display(), err);
                continue;
            }
        };
        report.scanned += 1;

        let upstream_name = mapper.map(&local.name);
        let Some(record) = upstream.get(&upstream_name) else {
            tracing::debug!("{} ({}) has no upstream counterpart", local.name, upstream_name);
            report.unmatched.push(local.name);
            continue;
        };

        let action = PlanAction::between(&local.version, &record.version);
        if action == PlanAction::Bump {
            tracing::info!("{}: {} => {}", local.name, local.version, record.version);
        }

        report.entries.push(PlanEntry {
            path: local.path,
            local_name: local.name,
            upstream_name,
            local_version: local.version,
            upstream_version: record.version.clone(),
            workspace: record.workspace.clone(),
            action,
        });
    }

    if report.bumps().next().is_none() {
        tracing::warn!("Nothing to bump, check that the target version is correct");
    }

    Ok(report)
}
