//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use pluginsync::MatchPolicy;

/// Find plugin package versions at the commit where an upstream workspace
/// declared a given platform version.
#[derive(Parser)]
#[command(name = "pluginsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Platform version to look for (e.g. 1.46.0)
    #[arg(long, value_name = "VERSION")]
    pub target: String,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// How a declared version is compared with the target: exact or fuzzy
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<MatchPolicy>,

    /// Workspace to resolve (repeatable; defaults to the configured list)
    #[arg(long = "workspace", value_name = "NAME")]
    pub workspaces: Vec<String>,

    /// Branch, tag or sha to read history from
    #[arg(long, value_name = "REF")]
    pub reference: Option<String>,

    /// Compare against local plugin packages under this directory
    #[arg(long, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_repeated_workspaces() {
        let cli = Cli::try_parse_from([
            "pluginsync",
            "--target",
            "1.46.0",
            "--workspace",
            "tekton",
            "--workspace",
            "quay",
            "--policy",
            "fuzzy",
        ])
        .unwrap();

        assert_eq!(cli.target, "1.46.0");
        assert_eq!(cli.workspaces, vec!["tekton".to_string(), "quay".to_string()]);
        assert_eq!(cli.policy, Some(MatchPolicy::Fuzzy));
        assert!(cli.local.is_none());
    }

    #[test]
    fn test_target_required() {
        assert!(Cli::try_parse_from(["pluginsync"]).is_err());
    }
}
