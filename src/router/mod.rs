//! Backend selection and dispatch.
//!
//! [`AnalysisRouter`] owns up to two [`CommitAnalyzer`] trait objects and
//! decides which one serves each request. Callers never see backend
//! errors: every failure is logged and collapsed into `None`, the single
//! "analysis unavailable" signal.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analyzers::hosted::HostedAnalyzer;
use crate::analyzers::local::LocalAnalyzer;
use crate::analyzers::{AnalyzerError, CommitAnalyzer};
use crate::config::Config;
use crate::models::{
    AnalysisKind, AnalysisOutcome, AnalysisRequest, AnalysisResult, HybridResult, QualityResult,
    SecurityResult,
};

/// Dispatch policy for analysis requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Pick one backend based on availability and the speed preference.
    Auto,
    /// Hosted backend only.
    Hosted,
    /// Self-hosted backend only.
    Local,
    /// Run both backends concurrently and merge.
    Hybrid,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisMode::Auto => "auto",
            AnalysisMode::Hosted => "hosted",
            AnalysisMode::Local => "local",
            AnalysisMode::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(AnalysisMode::Auto),
            "hosted" => Ok(AnalysisMode::Hosted),
            "local" => Ok(AnalysisMode::Local),
            "hybrid" => Ok(AnalysisMode::Hybrid),
            other => Err(format!(
                "unknown mode '{other}' (expected auto, hosted, local, or hybrid)"
            )),
        }
    }
}

/// Initial mode from backend availability.
///
/// Both or neither available resolves to [`AnalysisMode::Auto`]; a single
/// available backend pins the mode to it.
pub fn resolve_mode(hosted_available: bool, local_available: bool) -> AnalysisMode {
    match (hosted_available, local_available) {
        (true, true) => AnalysisMode::Auto,
        (true, false) => AnalysisMode::Hosted,
        (false, true) => AnalysisMode::Local,
        (false, false) => AnalysisMode::Auto,
    }
}

/// Snapshot of router state for the `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct RouterStatus {
    pub mode: AnalysisMode,
    pub hosted_available: bool,
    pub hosted_model: Option<String>,
    pub local_available: bool,
    pub local_model: Option<String>,
    pub local_host: Option<String>,
    pub prefer_fast: bool,
}

/// Result of a kind-dispatched analysis, one variant per request kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    Review(AnalysisOutcome),
    Security(SecurityResult),
    Quality(QualityResult),
}

/// Routes analysis requests to the configured backends.
pub struct AnalysisRouter {
    hosted: Option<Arc<dyn CommitAnalyzer>>,
    local: Option<Arc<dyn CommitAnalyzer>>,
    mode: AnalysisMode,
    prefer_fast: bool,
}

impl AnalysisRouter {
    /// Build a router over pre-constructed backends. The starting mode is
    /// derived from which slots are filled.
    pub fn new(
        hosted: Option<Arc<dyn CommitAnalyzer>>,
        local: Option<Arc<dyn CommitAnalyzer>>,
        prefer_fast: bool,
    ) -> Self {
        let mode = resolve_mode(hosted.is_some(), local.is_some());
        Self {
            hosted,
            local,
            mode,
            prefer_fast,
        }
    }

    /// Construct both backends from config, tolerating either being
    /// unavailable. The local backend is probed over the network, so this
    /// is async.
    pub async fn from_config(config: &Config, client: &reqwest::Client) -> Self {
        let hosted: Option<Arc<dyn CommitAnalyzer>> =
            match HostedAnalyzer::new(config.hosted.clone(), client.clone()) {
                Ok(analyzer) => {
                    info!(model = %config.hosted.model, "hosted backend ready");
                    Some(Arc::new(analyzer))
                }
                Err(e) => {
                    warn!("hosted backend unavailable: {e}");
                    None
                }
            };

        let local: Option<Arc<dyn CommitAnalyzer>> =
            match LocalAnalyzer::connect(config.local.clone(), client.clone()).await {
                Ok(analyzer) => {
                    info!(
                        model = %config.local.model,
                        host = %config.local.host,
                        "local backend ready"
                    );
                    Some(Arc::new(analyzer))
                }
                Err(e) => {
                    warn!(host = %config.local.host, "local backend unavailable: {e}");
                    None
                }
            };

        Self::new(hosted, local, config.analysis.prefer_fast)
    }

    /// The stored mode.
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Change the stored mode. Per-request overrides do not go through
    /// here and leave the stored mode untouched.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.mode = mode;
    }

    /// Current availability and selection state.
    pub fn status(&self) -> RouterStatus {
        RouterStatus {
            mode: self.mode,
            hosted_available: self.hosted.is_some(),
            hosted_model: self.hosted.as_ref().map(|b| b.model_id().to_string()),
            local_available: self.local.is_some(),
            local_model: self.local.as_ref().map(|b| b.model_id().to_string()),
            local_host: self
                .local
                .as_ref()
                .and_then(|b| b.host().map(str::to_string)),
            prefer_fast: self.prefer_fast,
        }
    }

    /// Dispatch a request by kind.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        mode: Option<AnalysisMode>,
    ) -> Option<AnalysisReport> {
        match request.kind {
            AnalysisKind::Review => self
                .analyze_diff(&request.diff, &request.commit_message, mode)
                .await
                .map(AnalysisReport::Review),
            AnalysisKind::Security => self
                .analyze_security(&request.diff, mode)
                .await
                .map(AnalysisReport::Security),
            AnalysisKind::Quality => self
                .quality_score(&request.diff, &request.commit_message, mode)
                .await
                .map(AnalysisReport::Quality),
        }
    }

    /// Full review of a commit diff.
    ///
    /// Hybrid mode fans out to both backends concurrently and merges;
    /// every other mode picks a single backend. A failed call does not
    /// fall through to the other backend.
    pub async fn analyze_diff(
        &self,
        diff: &str,
        commit_message: &str,
        mode: Option<AnalysisMode>,
    ) -> Option<AnalysisOutcome> {
        let mode = mode.unwrap_or(self.mode);

        if mode == AnalysisMode::Hybrid {
            return self.analyze_hybrid(diff, commit_message).await;
        }

        let backend = self.pick(mode)?;
        match backend.analyze_diff(diff, commit_message).await {
            Ok(result) => Some(AnalysisOutcome::Single(result)),
            Err(e) => {
                warn!(source = %backend.source(), "review analysis failed: {e}");
                None
            }
        }
    }

    /// Security-focused analysis. Hybrid mode is not meaningful for a
    /// single free-text report, so it yields the unavailable signal.
    pub async fn analyze_security(
        &self,
        diff: &str,
        mode: Option<AnalysisMode>,
    ) -> Option<SecurityResult> {
        let mode = mode.unwrap_or(self.mode);
        if mode == AnalysisMode::Hybrid {
            warn!("hybrid mode is not supported for security analysis");
            return None;
        }

        let backend = self.pick(mode)?;
        match backend.analyze_security(diff).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(source = %backend.source(), "security analysis failed: {e}");
                None
            }
        }
    }

    /// Quality rating with an optional numeric score. Hybrid mode yields
    /// the unavailable signal, same as security.
    pub async fn quality_score(
        &self,
        diff: &str,
        commit_message: &str,
        mode: Option<AnalysisMode>,
    ) -> Option<QualityResult> {
        let mode = mode.unwrap_or(self.mode);
        if mode == AnalysisMode::Hybrid {
            warn!("hybrid mode is not supported for quality scoring");
            return None;
        }

        let backend = self.pick(mode)?;
        match backend.quality_score(diff, commit_message).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(source = %backend.source(), "quality scoring failed: {e}");
                None
            }
        }
    }

    /// Run both backends concurrently and merge per-slot results. One
    /// backend failing still produces a hybrid outcome from the other;
    /// both failing (or both absent) yields the unavailable signal.
    async fn analyze_hybrid(&self, diff: &str, commit_message: &str) -> Option<AnalysisOutcome> {
        if self.hosted.is_none() && self.local.is_none() {
            return None;
        }

        let hosted_fut = async {
            match &self.hosted {
                Some(backend) => Some(backend.analyze_diff(diff, commit_message).await),
                None => None,
            }
        };
        let local_fut = async {
            match &self.local {
                Some(backend) => Some(backend.analyze_diff(diff, commit_message).await),
                None => None,
            }
        };
        let (hosted_out, local_out) = tokio::join!(hosted_fut, local_fut);

        let hosted = hosted_out.and_then(|r| Self::log_slot("hosted", r));
        let local = local_out.and_then(|r| Self::log_slot("local", r));

        if hosted.is_none() && local.is_none() {
            warn!("hybrid analysis failed on every backend");
            return None;
        }

        Some(AnalysisOutcome::Hybrid(HybridResult::merge(hosted, local)))
    }

    fn log_slot(
        slot: &str,
        result: Result<AnalysisResult, AnalyzerError>,
    ) -> Option<AnalysisResult> {
        match result {
            Ok(r) => Some(r),
            Err(e) => {
                warn!("hybrid {slot} slot failed: {e}");
                None
            }
        }
    }

    /// Choose a single backend for the effective mode.
    ///
    /// Auto honors `prefer_fast` when the local backend is present and
    /// otherwise takes whichever backend exists, hosted first.
    fn pick(&self, mode: AnalysisMode) -> Option<&Arc<dyn CommitAnalyzer>> {
        match mode {
            AnalysisMode::Hosted => self.hosted.as_ref(),
            AnalysisMode::Local => self.local.as_ref(),
            AnalysisMode::Auto => {
                if self.prefer_fast && self.local.is_some() {
                    self.local.as_ref()
                } else {
                    self.hosted.as_ref().or(self.local.as_ref())
                }
            }
            AnalysisMode::Hybrid => None,
        }
    }
}
