//! pluginsync CLI - plugin package versions at an upstream platform version

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use pluginsync::ops::{
    merge, plan, NameMapper, WorkspaceOutcome, WorkspaceResolver, WorkspaceSummary,
};
use pluginsync::sources::{GitHubRemote, ReqwestTransport};
use pluginsync::util::diagnostic::emit;
use pluginsync::GlobalContext;

mod cli;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("pluginsync=debug")
    } else {
        EnvFilter::new("pluginsync=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_color(!cli.no_color);

    let config = ctx.load_config()?;
    config.validate().context("invalid configuration")?;

    let workspaces = if cli.workspaces.is_empty() {
        config.workspaces()
    } else {
        cli.workspaces.clone()
    };
    let reference = cli
        .reference
        .clone()
        .unwrap_or_else(|| config.reference().to_string());

    let transport = ReqwestTransport::new(config.timeout())?;
    let remote = GitHubRemote::new(
        transport,
        Url::parse(config.api_url()).context("invalid net.api_url")?,
        Url::parse(config.raw_url()).context("invalid net.raw_url")?,
    )
    .with_user_agent(config.user_agent())
    .with_token(ctx.github_token(&config));

    if !remote.is_authenticated() {
        tracing::debug!(
            "{} is not set, GitHub API requests are unauthenticated",
            config.token_env()
        );
    }

    let resolver = WorkspaceResolver::new(remote, config.coordinate())
        .with_layout(config.layout())
        .with_policy(cli.policy.unwrap_or_default())
        .with_reference(reference)
        .with_per_page(config.per_page());

    let outcomes = resolver.resolve_all(&workspaces, &cli.target);

    for (workspace, outcome) in &outcomes {
        tracing::debug!("{:?}", WorkspaceSummary::new(workspace, outcome));
        let probe = resolver.probe(workspace, &cli.target);
        if let Some(diag) = outcome.to_diagnostic(workspace, &probe) {
            emit(&diag, ctx.color());
        }
    }

    if !outcomes.is_empty()
        && outcomes
            .iter()
            .all(|(_, outcome)| matches!(outcome, WorkspaceOutcome::Failed(_)))
    {
        bail!("every workspace failed to resolve");
    }

    let packages = merge(outcomes.iter().map(|(_, outcome)| outcome));
    tracing::debug!("{} packages at target {}", packages.len(), cli.target);

    let output = match &cli.local {
        Some(local) => {
            let mapper = NameMapper::new(&config.rename_rules())?;
            let report = plan(local, &packages, &mapper)?;
            serde_json::to_string_pretty(&report)?
        }
        None => serde_json::to_string_pretty(&packages)?,
    };
    println!("{}", output);

    Ok(())
}
