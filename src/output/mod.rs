//! Output renderers: colored terminal text and machine-readable JSON.

pub mod json;
pub mod terminal;

use std::str::FromStr;

use crate::github::CommitInfo;
use crate::router::{AnalysisReport, RouterStatus};

/// Selected output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" | "text" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{other}' (expected terminal or json)")),
        }
    }
}

impl OutputFormat {
    pub fn render_report(&self, report: &AnalysisReport) -> String {
        match self {
            OutputFormat::Terminal => terminal::render_report(report),
            OutputFormat::Json => json::render(report),
        }
    }

    pub fn render_status(&self, status: &RouterStatus) -> String {
        match self {
            OutputFormat::Terminal => terminal::render_status(status),
            OutputFormat::Json => json::render(status),
        }
    }

    pub fn render_commits(&self, commits: &[CommitInfo]) -> String {
        match self {
            OutputFormat::Terminal => terminal::render_commits(commits),
            OutputFormat::Json => json::render(&commits),
        }
    }
}
