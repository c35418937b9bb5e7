//! Version probes and matching policies.
//!
//! A probe names the version-declaration file to inspect and the version
//! being looked for. The [`MatchPolicy`] decides what "matches" means and
//! how the best candidate is picked when several commits qualify.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference searched when the caller does not name one.
pub const DEFAULT_REFERENCE: &str = "main";

/// A request to find the commit where `path` declared `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionProbe {
    /// File path within the repository
    pub path: String,

    /// Requested version, exact (`1.45.2`) or partial (`1.45`)
    pub target: String,

    /// Branch, tag or sha the history walk starts from
    pub reference: String,
}

impl VersionProbe {
    /// Create a probe against the default reference.
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        VersionProbe {
            path: path.into(),
            target: target.into(),
            reference: DEFAULT_REFERENCE.to_string(),
        }
    }

    /// Search from a different reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }
}

/// How a declared version is compared against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Declared version must equal the target. Newest qualifying commit wins.
    #[default]
    Exact,

    /// Target must be a substring of the declared version. The
    /// lexicographically greatest qualifying version wins.
    Fuzzy,
}

impl MatchPolicy {
    /// Check whether a declared version qualifies for `target`.
    pub fn matches(&self, declared: &str, target: &str) -> bool {
        match self {
            MatchPolicy::Exact => declared == target,
            MatchPolicy::Fuzzy => declared.contains(target),
        }
    }

    /// Whether the history walk can stop at the first qualifying commit.
    ///
    /// History is newest first, so under the exact policy the first hit is
    /// already the answer. The fuzzy policy has to see every commit.
    pub fn stops_on_first_match(&self) -> bool {
        matches!(self, MatchPolicy::Exact)
    }

    /// Whether `candidate` should replace `current` as the best match.
    ///
    /// Ties keep the current (earlier discovered, so newer) commit.
    pub fn prefers(&self, candidate: &str, current: &str) -> bool {
        match self {
            MatchPolicy::Exact => false,
            MatchPolicy::Fuzzy => candidate.cmp(current) == Ordering::Greater,
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Exact => write!(f, "exact"),
            MatchPolicy::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(MatchPolicy::Exact),
            "fuzzy" => Ok(MatchPolicy::Fuzzy),
            _ => Err(format!(
                "invalid match policy '{}'; expected 'exact' or 'fuzzy'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_policy() {
        let policy = MatchPolicy::Exact;
        assert!(policy.matches("1.45.0", "1.45.0"));
        assert!(!policy.matches("1.45.0", "1.45"));
        assert!(!policy.matches("undefined", "1.45.0"));
        assert!(policy.stops_on_first_match());
    }

    #[test]
    fn test_fuzzy_policy() {
        let policy = MatchPolicy::Fuzzy;
        assert!(policy.matches("1.45.2", "1.45"));
        assert!(policy.matches("1.45.0", "1.45.0"));
        assert!(!policy.matches("1.44.9", "1.45"));
        assert!(!policy.stops_on_first_match());
    }

    #[test]
    fn test_fuzzy_prefers_greater_string() {
        let policy = MatchPolicy::Fuzzy;
        assert!(policy.prefers("1.45.2", "1.45.1"));
        assert!(!policy.prefers("1.45.0", "1.45.2"));
        // ties keep the existing candidate
        assert!(!policy.prefers("1.45.2", "1.45.2"));
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("exact".parse::<MatchPolicy>().unwrap(), MatchPolicy::Exact);
        assert_eq!("FUZZY".parse::<MatchPolicy>().unwrap(), MatchPolicy::Fuzzy);
        assert!("semver".parse::<MatchPolicy>().is_err());
    }

    #[test]
    fn test_probe_default_reference() {
        let probe = VersionProbe::new("workspaces/tekton/backstage.json", "1.46.0");
        assert_eq!(probe.reference, "main");

        let probe = probe.with_reference("release-1.46");
        assert_eq!(probe.reference, "release-1.46");
    }
}
