//! Shared types used across all modules.
//!
//! Defines the value types flowing between the analysis router, the two
//! backends, and callers. Other modules import from here rather than
//! reaching into each other's internals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the caller wants analyzed about a commit.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Literal patch/diff text. Unbounded here; each backend enforces
    /// its own maximum before transmission.
    pub diff: String,
    pub commit_message: String,
    pub kind: AnalysisKind,
}

impl AnalysisRequest {
    pub fn new(diff: impl Into<String>, commit_message: impl Into<String>, kind: AnalysisKind) -> Self {
        Self {
            diff: diff.into(),
            commit_message: commit_message.into(),
            kind,
        }
    }
}

/// The kind of analysis requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    #[default]
    Review,
    Security,
    Quality,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Review => write!(f, "review"),
            AnalysisKind::Security => write!(f, "security"),
            AnalysisKind::Quality => write!(f, "quality"),
        }
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "review" => Ok(AnalysisKind::Review),
            "security" => Ok(AnalysisKind::Security),
            "quality" => Ok(AnalysisKind::Quality),
            other => Err(format!(
                "unsupported analysis kind: '{other}'. Supported: review, security, quality"
            )),
        }
    }
}

/// Which backend produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// The hosted chat-completion API.
    Hosted,
    /// The self-hosted model server.
    Local,
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSource::Hosted => write!(f, "hosted"),
            AnalysisSource::Local => write!(f, "local"),
        }
    }
}

/// Structured outcome of one backend's review of a diff.
///
/// Fields other than `raw_text` and `source` may be empty strings when the
/// model's reply did not contain a matching labeled section — absence is
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub impact: String,
    pub strengths: String,
    pub concerns: String,
    pub recommendation: String,
    /// The untouched model reply, retained for audit/debugging.
    pub raw_text: String,
    pub source: AnalysisSource,
    pub model: String,
}

/// Security-focused analysis. The reply is kept unstructured beyond
/// capturing the whole text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityResult {
    pub analysis: String,
    pub raw_text: String,
    pub source: AnalysisSource,
    pub model: String,
}

/// Commit quality assessment with an optional 1..=10 score.
///
/// `score` is `None` when no line of the reply contained both a score
/// label and an in-range bare integer; it is never inferred or defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    pub analysis: String,
    pub score: Option<u8>,
    pub raw_text: String,
    pub source: AnalysisSource,
    pub model: String,
}

/// Combined outcome of comparison (hybrid) mode.
///
/// A backend that failed or was absent contributes `None` for its slot.
/// `summary` is the first non-empty summary, hosted preferred over local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridResult {
    pub hosted: Option<AnalysisResult>,
    pub local: Option<AnalysisResult>,
    pub summary: String,
}

impl HybridResult {
    /// Merge per-backend slots, choosing the first non-empty summary with
    /// the hosted backend preferred.
    pub fn merge(hosted: Option<AnalysisResult>, local: Option<AnalysisResult>) -> Self {
        let summary = [&hosted, &local]
            .into_iter()
            .flatten()
            .map(|r| r.summary.as_str())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string();
        Self {
            hosted,
            local,
            summary,
        }
    }
}

/// What a diff review produced: a single backend's result, or a
/// comparison of every available backend when hybrid mode ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Single(AnalysisResult),
    Hybrid(HybridResult),
}

impl AnalysisOutcome {
    /// The headline summary regardless of variant.
    pub fn summary(&self) -> &str {
        match self {
            AnalysisOutcome::Single(r) => &r.summary,
            AnalysisOutcome::Hybrid(h) => &h.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(source: AnalysisSource, summary: &str) -> AnalysisResult {
        AnalysisResult {
            summary: summary.to_string(),
            impact: String::new(),
            strengths: String::new(),
            concerns: String::new(),
            recommendation: String::new(),
            raw_text: summary.to_string(),
            source,
            model: "test-model".to_string(),
        }
    }

    #[test]
    fn kind_display_and_parse_roundtrip() {
        for kind in [AnalysisKind::Review, AnalysisKind::Security, AnalysisKind::Quality] {
            let parsed: AnalysisKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn kind_parse_invalid() {
        let err = "styles".parse::<AnalysisKind>().unwrap_err();
        assert!(err.contains("unsupported analysis kind"));
    }

    #[test]
    fn source_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&AnalysisSource::Hosted).unwrap(),
            "\"hosted\""
        );
        assert_eq!(
            serde_json::to_string(&AnalysisSource::Local).unwrap(),
            "\"local\""
        );
    }

    #[test]
    fn hybrid_merge_prefers_hosted_summary() {
        let merged = HybridResult::merge(
            Some(result(AnalysisSource::Hosted, "hosted view")),
            Some(result(AnalysisSource::Local, "local view")),
        );
        assert_eq!(merged.summary, "hosted view");
    }

    #[test]
    fn hybrid_merge_falls_through_empty_hosted_summary() {
        let merged = HybridResult::merge(
            Some(result(AnalysisSource::Hosted, "")),
            Some(result(AnalysisSource::Local, "local view")),
        );
        assert_eq!(merged.summary, "local view");
    }

    #[test]
    fn hybrid_merge_with_empty_slots() {
        let merged = HybridResult::merge(None, None);
        assert!(merged.summary.is_empty());
        assert!(merged.hosted.is_none());
        assert!(merged.local.is_none());
    }

    #[test]
    fn quality_score_serializes_as_null_when_unset() {
        let quality = QualityResult {
            analysis: "meh".to_string(),
            score: None,
            raw_text: "meh".to_string(),
            source: AnalysisSource::Local,
            model: "mistral".to_string(),
        };
        let json = serde_json::to_value(&quality).unwrap();
        assert!(json["score"].is_null());
    }
}
