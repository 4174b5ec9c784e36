//! Analysis backends and the trait they share.
//!
//! Two backends implement [`CommitAnalyzer`] against different transports:
//! the hosted chat-completion API ([`hosted::HostedAnalyzer`]) and a
//! self-hosted model server ([`local::LocalAnalyzer`]). The router owns
//! them as trait objects and never sees transport details.

pub mod hosted;
pub mod local;
pub mod sections;
pub mod truncate;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AnalysisResult, AnalysisSource, QualityResult, SecurityResult};

/// Errors from a backend invocation.
///
/// These never escape the router: every variant is converted to the
/// uniform "unavailable" sentinel at the dispatch boundary after logging.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A required credential or endpoint is missing; the backend is not
    /// constructed at all.
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    /// Network failure or request timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned HTTP {status}")]
    Http { status: reqwest::StatusCode },

    /// A well-formed reply that carried no generated text.
    #[error("empty response from model")]
    EmptyResponse,
}

/// One concrete text-generation backend.
///
/// Every operation truncates the diff to this backend's own limit,
/// builds a prompt, calls the remote endpoint under a bounded timeout,
/// and parses the reply. Failures are returned, never raised past the
/// trait boundary.
#[async_trait]
pub trait CommitAnalyzer: Send + Sync {
    /// Review a commit diff and return the five-section analysis.
    async fn analyze_diff(
        &self,
        diff: &str,
        commit_message: &str,
    ) -> Result<AnalysisResult, AnalyzerError>;

    /// Security-focused analysis of a diff.
    async fn analyze_security(&self, diff: &str) -> Result<SecurityResult, AnalyzerError>;

    /// Rate commit quality, extracting a 1..=10 score when present.
    async fn quality_score(
        &self,
        diff: &str,
        commit_message: &str,
    ) -> Result<QualityResult, AnalyzerError>;

    /// Which backend this is.
    fn source(&self) -> AnalysisSource;

    /// The model identifier results are tagged with.
    fn model_id(&self) -> &str;

    /// The endpoint host, where one is meaningful (local backend only).
    fn host(&self) -> Option<&str> {
        None
    }
}
