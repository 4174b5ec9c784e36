//! Clap argument types and input validation.

use clap::Parser;
use std::path::PathBuf;

use commitlens::output::OutputFormat;
use commitlens::router::AnalysisMode;

/// AI-assisted commit analysis CLI.
#[derive(Parser, Debug)]
#[command(name = "commitlens", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Full review of a commit diff.
    Review(AnalysisArgs),

    /// Security-focused analysis of a commit diff.
    Security(AnalysisArgs),

    /// Rate commit quality on a 1-10 scale.
    Quality(AnalysisArgs),

    /// Show backend availability and the active dispatch mode.
    Status(StatusArgs),

    /// List recent commits of a GitHub repository.
    Commits(CommitsArgs),
}

/// Shared arguments for the analysis subcommands.
#[derive(Parser, Debug)]
pub struct AnalysisArgs {
    /// Pre-computed unified diff file.
    #[arg(long, conflicts_with_all = ["repo", "sha"])]
    pub diff_file: Option<PathBuf>,

    /// Read a unified diff from stdin.
    #[arg(long, default_value_t = false, conflicts_with_all = ["diff_file", "repo", "sha"])]
    pub diff_stdin: bool,

    /// GitHub repository (owner/name or URL) to fetch the diff from.
    #[arg(long, requires = "sha")]
    pub repo: Option<String>,

    /// Commit SHA to fetch from the repository.
    #[arg(long, requires = "repo")]
    pub sha: Option<String>,

    /// Commit message accompanying the diff.
    #[arg(long, short, default_value = "")]
    pub message: String,

    /// Dispatch mode override: auto, hosted, local, or hybrid.
    #[arg(long)]
    pub mode: Option<AnalysisMode>,

    /// Output format: terminal or json.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format: terminal or json.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Arguments for the `commits` subcommand.
#[derive(Parser, Debug)]
pub struct CommitsArgs {
    /// GitHub repository (owner/name or URL).
    pub repo: String,

    /// How many commits to list.
    #[arg(long, short = 'n', default_value_t = 10)]
    pub limit: usize,

    /// Output format: terminal or json.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}
