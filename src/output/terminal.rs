//! Terminal renderer: colored flowing text, one block per section.

use colored::Colorize;

use crate::github::CommitInfo;
use crate::models::{AnalysisOutcome, AnalysisResult, QualityResult, SecurityResult};
use crate::router::{AnalysisReport, RouterStatus};

const RULE: &str = "───────────────────────────────────";

pub fn render_report(report: &AnalysisReport) -> String {
    match report {
        AnalysisReport::Review(outcome) => render_outcome(outcome),
        AnalysisReport::Security(result) => render_security(result),
        AnalysisReport::Quality(result) => render_quality(result),
    }
}

fn render_outcome(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Single(result) => render_review(result),
        AnalysisOutcome::Hybrid(hybrid) => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", " Hybrid analysis".bold()));
            if !hybrid.summary.is_empty() {
                output.push_str(&format!(" {}\n\n", hybrid.summary));
            }
            match &hybrid.hosted {
                Some(result) => {
                    output.push_str(&format!("{}\n", RULE.dimmed()));
                    output.push_str(&render_review(result));
                }
                None => output.push_str(&format!(" {}\n", "✖ hosted backend failed".red())),
            }
            match &hybrid.local {
                Some(result) => {
                    output.push_str(&format!("{}\n", RULE.dimmed()));
                    output.push_str(&render_review(result));
                }
                None => output.push_str(&format!(" {}\n", "✖ local backend failed".red())),
            }
            output
        }
    }
}

fn render_review(result: &AnalysisResult) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        " {} {}\n\n",
        result.source.to_string().cyan().bold(),
        result.model.dimmed()
    ));

    let sections = [
        ("Summary", &result.summary),
        ("Impact", &result.impact),
        ("Strengths", &result.strengths),
        ("Concerns", &result.concerns),
        ("Recommendation", &result.recommendation),
    ];
    let mut any = false;
    for (label, body) in sections {
        if body.is_empty() {
            continue;
        }
        any = true;
        output.push_str(&format!(" {}\n {}\n\n", label.bold(), body));
    }
    // Unstructured replies still carry information
    if !any && !result.raw_text.is_empty() {
        output.push_str(&format!(" {}\n\n", result.raw_text));
    }
    output
}

fn render_security(result: &SecurityResult) -> String {
    format!(
        " {} {} {}\n\n {}\n",
        "Security analysis".bold(),
        result.source.to_string().cyan(),
        result.model.dimmed(),
        result.analysis
    )
}

fn render_quality(result: &QualityResult) -> String {
    let score = match result.score {
        Some(n) if n >= 8 => format!("{n}/10").green().bold().to_string(),
        Some(n) if n >= 5 => format!("{n}/10").yellow().bold().to_string(),
        Some(n) => format!("{n}/10").red().bold().to_string(),
        None => "unscored".dimmed().to_string(),
    };
    format!(
        " {} {} {} {}\n\n {}\n",
        "Quality".bold(),
        score,
        result.source.to_string().cyan(),
        result.model.dimmed(),
        result.analysis
    )
}

pub fn render_status(status: &RouterStatus) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        " {} {}\n",
        "mode".bold(),
        status.mode.to_string().cyan()
    ));
    output.push_str(&render_backend_line(
        "hosted",
        status.hosted_available,
        status.hosted_model.as_deref(),
        None,
    ));
    output.push_str(&render_backend_line(
        "local",
        status.local_available,
        status.local_model.as_deref(),
        status.local_host.as_deref(),
    ));
    output.push_str(&format!(
        " {} {}\n",
        "prefer_fast".bold(),
        status.prefer_fast
    ));
    output
}

fn render_backend_line(
    name: &str,
    available: bool,
    model: Option<&str>,
    host: Option<&str>,
) -> String {
    let state = if available {
        "✔ available".green().to_string()
    } else {
        "✖ unavailable".red().to_string()
    };
    let mut line = format!(" {} {}", name.bold(), state);
    if let Some(model) = model {
        line.push_str(&format!(" {}", model.dimmed()));
    }
    if let Some(host) = host {
        line.push_str(&format!(" {}", host.dimmed()));
    }
    line.push('\n');
    line
}

pub fn render_commits(commits: &[CommitInfo]) -> String {
    if commits.is_empty() {
        return format!("{}", "  No commits found.\n".dimmed());
    }
    let mut output = String::new();
    for commit in commits {
        output.push_str(&format!(
            " {} {}\n   {} {}\n",
            commit.short_sha.yellow(),
            commit.message.bold(),
            commit.author.dimmed(),
            commit.date.dimmed()
        ));
    }
    output
}
