//! Thin GitHub API client.
//!
//! Fetches exactly two things for analysis: a commit's diff in patch
//! format and a page of recent commit metadata. Any failure is logged
//! and surfaced as `None`, matching the router's unavailable signal.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::config::GithubConfig;
use crate::constants;

/// Metadata for one commit in a repository's history.
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    pub sha: String,
    pub short_sha: String,
    pub message: String,
    pub author: String,
    pub date: String,
}

/// GitHub REST client scoped to commit lookups.
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl GithubClient {
    pub fn new(config: &GithubConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout: config.timeout(),
        }
    }

    /// Normalize `owner/name`, a github.com URL, or a `.git` clone URL
    /// into `owner/name`. Returns `None` for anything else.
    pub fn parse_repo(input: &str) -> Option<String> {
        let trimmed = input
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("github.com/")
            .trim_end_matches('/')
            .trim_end_matches(".git");

        let mut parts = trimmed.split('/');
        let owner = parts.next().filter(|s| !s.is_empty())?;
        let name = parts.next().filter(|s| !s.is_empty())?;
        if parts.next().is_some() {
            return None;
        }
        Some(format!("{owner}/{name}"))
    }

    /// Fetch a commit's diff in unified patch format.
    pub async fn commit_diff(&self, repo: &str, sha: &str) -> Option<String> {
        let repo = Self::parse_repo(repo)?;
        let url = format!("{}/repos/{repo}/commits/{sha}", self.api_url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3.patch")
            .header("User-Agent", constants::APP_NAME)
            .timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(%repo, %sha, "commit diff request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(%repo, %sha, status = %response.status(), "commit diff request rejected");
            return None;
        }
        match response.text().await {
            Ok(patch) => Some(patch),
            Err(e) => {
                warn!(%repo, %sha, "failed to read commit diff body: {e}");
                None
            }
        }
    }

    /// Fetch the most recent commits on the default branch.
    pub async fn recent_commits(&self, repo: &str, limit: usize) -> Option<Vec<CommitInfo>> {
        let repo = Self::parse_repo(repo)?;
        let url = format!("{}/repos/{repo}/commits", self.api_url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", limit.to_string())])
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", constants::APP_NAME)
            .timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(%repo, "commit history request failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(%repo, status = %response.status(), "commit history request rejected");
            return None;
        }

        let entries: Vec<CommitEntry> = match response.json().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%repo, "failed to decode commit history: {e}");
                return None;
            }
        };

        Some(entries.into_iter().map(CommitInfo::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
}

impl From<CommitEntry> for CommitInfo {
    fn from(entry: CommitEntry) -> Self {
        let short_sha = entry.sha.chars().take(7).collect();
        // First line only: full messages can run to paragraphs.
        let message = entry
            .commit
            .message
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        let (author, date) = match entry.commit.author {
            Some(a) => (a.name, a.date),
            None => (String::new(), String::new()),
        };
        Self {
            sha: entry.sha,
            short_sha,
            message,
            author,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_repo_accepts_owner_name() {
        assert_eq!(
            GithubClient::parse_repo("rust-lang/cargo").as_deref(),
            Some("rust-lang/cargo")
        );
    }

    #[test]
    fn parse_repo_accepts_url_forms() {
        assert_eq!(
            GithubClient::parse_repo("https://github.com/rust-lang/cargo").as_deref(),
            Some("rust-lang/cargo")
        );
        assert_eq!(
            GithubClient::parse_repo("https://github.com/rust-lang/cargo.git").as_deref(),
            Some("rust-lang/cargo")
        );
        assert_eq!(
            GithubClient::parse_repo("github.com/rust-lang/cargo/").as_deref(),
            Some("rust-lang/cargo")
        );
    }

    #[test]
    fn parse_repo_rejects_garbage() {
        assert_eq!(GithubClient::parse_repo("cargo"), None);
        assert_eq!(GithubClient::parse_repo(""), None);
        assert_eq!(GithubClient::parse_repo("a/b/c"), None);
    }

    #[test]
    fn commit_entry_maps_to_info() {
        let json = r#"{
            "sha": "0123456789abcdef",
            "commit": {
                "message": "Fix parser\n\nLong body here.",
                "author": {"name": "Ada", "date": "2025-11-02T10:00:00Z"}
            }
        }"#;
        let entry: CommitEntry = serde_json::from_str(json).unwrap();
        let info = CommitInfo::from(entry);
        assert_eq!(info.short_sha, "0123456");
        assert_eq!(info.message, "Fix parser");
        assert_eq!(info.author, "Ada");
        assert_eq!(info.date, "2025-11-02T10:00:00Z");
    }

    #[test]
    fn commit_entry_tolerates_missing_author() {
        let json = r#"{"sha": "abc1234", "commit": {"message": "init"}}"#;
        let entry: CommitEntry = serde_json::from_str(json).unwrap();
        let info = CommitInfo::from(entry);
        assert_eq!(info.author, "");
        assert_eq!(info.date, "");
    }
}
