//! commitlens — AI-assisted commit analysis CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use commitlens::config::Config;
use commitlens::env::Env;
use commitlens::github::GithubClient;
use commitlens::models::{AnalysisKind, AnalysisRequest};
use commitlens::router::AnalysisRouter;

use std::io::Read;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cli::args::{AnalysisArgs, Cli, Command, CommitsArgs, StatusArgs};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by RUST_LOG (default: warnings only).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();
    let config = Config::load(Some(Path::new(".")), &env).context("failed to load config")?;
    let client = reqwest::Client::new();

    match cli.command {
        Command::Review(args) => {
            run_analysis(AnalysisKind::Review, args, &config, &client).await
        }
        Command::Security(args) => {
            run_analysis(AnalysisKind::Security, args, &config, &client).await
        }
        Command::Quality(args) => {
            run_analysis(AnalysisKind::Quality, args, &config, &client).await
        }
        Command::Status(args) => run_status(args, &config, &client).await,
        Command::Commits(args) => run_commits(args, &config, &client).await,
    }
}

/// Run one analysis kind end to end: acquire the diff, dispatch, render.
async fn run_analysis(
    kind: AnalysisKind,
    args: AnalysisArgs,
    config: &Config,
    client: &reqwest::Client,
) -> Result<()> {
    let diff = acquire_diff(&args, config, client).await?;
    if diff.trim().is_empty() {
        bail!("the diff is empty; nothing to analyze");
    }

    let router = AnalysisRouter::from_config(config, client).await;
    let request = AnalysisRequest::new(diff, args.message.clone(), kind);

    match router.analyze(&request, args.mode).await {
        Some(report) => {
            print!("{}", args.format.render_report(&report));
            Ok(())
        }
        None => bail!("analysis unavailable: no backend could serve this request"),
    }
}

/// Resolve the diff from the selected input source.
async fn acquire_diff(
    args: &AnalysisArgs,
    config: &Config,
    client: &reqwest::Client,
) -> Result<String> {
    if let Some(path) = &args.diff_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read diff file {}", path.display()));
    }
    if args.diff_stdin {
        let mut diff = String::new();
        std::io::stdin()
            .read_to_string(&mut diff)
            .context("failed to read diff from stdin")?;
        return Ok(diff);
    }
    if let (Some(repo), Some(sha)) = (&args.repo, &args.sha) {
        let github = GithubClient::new(&config.github, client.clone());
        return github
            .commit_diff(repo, sha)
            .await
            .with_context(|| format!("failed to fetch diff for {repo}@{sha}"));
    }
    bail!("no diff input: pass --diff-file, --diff-stdin, or --repo with --sha");
}

async fn run_status(args: StatusArgs, config: &Config, client: &reqwest::Client) -> Result<()> {
    let router = AnalysisRouter::from_config(config, client).await;
    print!("{}", args.format.render_status(&router.status()));
    Ok(())
}

async fn run_commits(args: CommitsArgs, config: &Config, client: &reqwest::Client) -> Result<()> {
    let github = GithubClient::new(&config.github, client.clone());
    let commits = github
        .recent_commits(&args.repo, args.limit)
        .await
        .with_context(|| format!("failed to fetch commits for {}", args.repo))?;
    print!("{}", args.format.render_commits(&commits));
    Ok(())
}
