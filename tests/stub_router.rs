//! Integration tests using stub analysis backends.
//!
//! Validates the router's dispatch behavior end-to-end without making
//! real API calls by using stub implementations of CommitAnalyzer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use commitlens::analyzers::sections::{extract_score, parse_sections};
use commitlens::analyzers::{AnalyzerError, CommitAnalyzer};
use commitlens::models::{
    AnalysisKind, AnalysisOutcome, AnalysisRequest, AnalysisResult, AnalysisSource, QualityResult,
    SecurityResult,
};
use commitlens::router::{AnalysisMode, AnalysisRouter};

/// A stub backend that replies with a canned text, parsed the same way
/// a real backend parses model output.
struct StubAnalyzer {
    source: AnalysisSource,
    model: String,
    reply: String,
    calls: AtomicUsize,
}

impl StubAnalyzer {
    fn new(source: AnalysisSource, model: &str, reply: &str) -> Self {
        Self {
            source,
            model: model.to_string(),
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CommitAnalyzer for StubAnalyzer {
    async fn analyze_diff(
        &self,
        _diff: &str,
        _commit_message: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(parse_sections(&self.reply).into_result(self.source, &self.model, &self.reply))
    }

    async fn analyze_security(&self, _diff: &str) -> Result<SecurityResult, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SecurityResult {
            analysis: self.reply.clone(),
            raw_text: self.reply.clone(),
            source: self.source,
            model: self.model.clone(),
        })
    }

    async fn quality_score(
        &self,
        _diff: &str,
        _commit_message: &str,
    ) -> Result<QualityResult, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(QualityResult {
            analysis: self.reply.clone(),
            score: extract_score(&self.reply),
            raw_text: self.reply.clone(),
            source: self.source,
            model: self.model.clone(),
        })
    }

    fn source(&self) -> AnalysisSource {
        self.source
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn host(&self) -> Option<&str> {
        match self.source {
            AnalysisSource::Local => Some("http://localhost:11434"),
            AnalysisSource::Hosted => None,
        }
    }
}

/// A stub backend whose every call fails.
struct FailingAnalyzer {
    source: AnalysisSource,
}

#[async_trait]
impl CommitAnalyzer for FailingAnalyzer {
    async fn analyze_diff(
        &self,
        _diff: &str,
        _commit_message: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        Err(AnalyzerError::EmptyResponse)
    }

    async fn analyze_security(&self, _diff: &str) -> Result<SecurityResult, AnalyzerError> {
        Err(AnalyzerError::EmptyResponse)
    }

    async fn quality_score(
        &self,
        _diff: &str,
        _commit_message: &str,
    ) -> Result<QualityResult, AnalyzerError> {
        Err(AnalyzerError::EmptyResponse)
    }

    fn source(&self) -> AnalysisSource {
        self.source
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

const DIFF: &str = "diff --git a/src/lib.rs b/src/lib.rs\n+fn added() {}\n";

fn hosted_stub(reply: &str) -> Arc<StubAnalyzer> {
    Arc::new(StubAnalyzer::new(AnalysisSource::Hosted, "gpt-4o-mini", reply))
}

fn local_stub(reply: &str) -> Arc<StubAnalyzer> {
    Arc::new(StubAnalyzer::new(AnalysisSource::Local, "mistral", reply))
}

fn single(outcome: AnalysisOutcome) -> AnalysisResult {
    match outcome {
        AnalysisOutcome::Single(result) => result,
        AnalysisOutcome::Hybrid(_) => panic!("expected a single-backend outcome"),
    }
}

#[tokio::test]
async fn auto_prefers_local_when_fast_preferred() {
    let hosted = hosted_stub("📝 SUMMARY: from hosted");
    let local = local_stub("📝 SUMMARY: from local");
    let router = AnalysisRouter::new(Some(hosted.clone()), Some(local.clone()), true);
    assert_eq!(router.mode(), AnalysisMode::Auto);

    let outcome = router.analyze_diff(DIFF, "msg", None).await.unwrap();
    let result = single(outcome);
    assert_eq!(result.source, AnalysisSource::Local);
    assert_eq!(result.summary, "from local");
    assert_eq!(hosted.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn auto_uses_hosted_when_fast_not_preferred() {
    let hosted = hosted_stub("📝 SUMMARY: from hosted");
    let local = local_stub("📝 SUMMARY: from local");
    let router = AnalysisRouter::new(Some(hosted), Some(local.clone()), false);

    let result = single(router.analyze_diff(DIFF, "msg", None).await.unwrap());
    assert_eq!(result.source, AnalysisSource::Hosted);
    assert_eq!(local.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn auto_uses_hosted_when_local_absent() {
    let hosted = hosted_stub("📝 SUMMARY: from hosted");
    let router = AnalysisRouter::new(Some(hosted), None, true);
    assert_eq!(router.mode(), AnalysisMode::Hosted);

    let result = single(router.analyze_diff(DIFF, "msg", None).await.unwrap());
    assert_eq!(result.source, AnalysisSource::Hosted);
}

#[tokio::test]
async fn auto_does_not_fall_back_when_local_fails() {
    // The selected backend failing yields the unavailable signal, it
    // does not silently retry on the other backend.
    let hosted = hosted_stub("📝 SUMMARY: from hosted");
    let local: Arc<dyn CommitAnalyzer> = Arc::new(FailingAnalyzer {
        source: AnalysisSource::Local,
    });
    let router = AnalysisRouter::new(Some(hosted.clone()), Some(local), true);

    assert!(router.analyze_diff(DIFF, "msg", None).await.is_none());
    assert_eq!(hosted.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn no_backends_yields_none_everywhere() {
    let router = AnalysisRouter::new(None, None, true);
    assert!(router.analyze_diff(DIFF, "msg", None).await.is_none());
    assert!(router.analyze_security(DIFF, None).await.is_none());
    assert!(router.quality_score(DIFF, "msg", None).await.is_none());
}

#[tokio::test]
async fn per_request_override_does_not_change_stored_mode() {
    let hosted = hosted_stub("📝 SUMMARY: from hosted");
    let local = local_stub("📝 SUMMARY: from local");
    let router = AnalysisRouter::new(Some(hosted), Some(local), true);

    let result = single(
        router
            .analyze_diff(DIFF, "msg", Some(AnalysisMode::Hosted))
            .await
            .unwrap(),
    );
    assert_eq!(result.source, AnalysisSource::Hosted);
    assert_eq!(router.mode(), AnalysisMode::Auto);
}

#[tokio::test]
async fn explicit_mode_with_missing_backend_is_unavailable() {
    let local = local_stub("📝 SUMMARY: from local");
    let router = AnalysisRouter::new(None, Some(local), true);

    let outcome = router
        .analyze_diff(DIFF, "msg", Some(AnalysisMode::Hosted))
        .await;
    assert!(outcome.is_none());
}

#[tokio::test]
async fn set_mode_is_reflected_in_status_and_dispatch() {
    let hosted = hosted_stub("📝 SUMMARY: from hosted");
    let local = local_stub("📝 SUMMARY: from local");
    let mut router = AnalysisRouter::new(Some(hosted), Some(local), true);

    router.set_mode(AnalysisMode::Hosted);
    let status = router.status();
    assert_eq!(status.mode, AnalysisMode::Hosted);
    assert_eq!(status.local_host.as_deref(), Some("http://localhost:11434"));

    let result = single(router.analyze_diff(DIFF, "msg", None).await.unwrap());
    assert_eq!(result.source, AnalysisSource::Hosted);
}

#[tokio::test]
async fn hybrid_merges_both_backends_hosted_summary_preferred() {
    let hosted = hosted_stub("📝 SUMMARY: from hosted");
    let local = local_stub("📝 SUMMARY: from local");
    let router = AnalysisRouter::new(Some(hosted.clone()), Some(local.clone()), true);

    let outcome = router
        .analyze_diff(DIFF, "msg", Some(AnalysisMode::Hybrid))
        .await
        .unwrap();
    match outcome {
        AnalysisOutcome::Hybrid(hybrid) => {
            assert_eq!(hybrid.summary, "from hosted");
            assert_eq!(hybrid.hosted.unwrap().source, AnalysisSource::Hosted);
            assert_eq!(hybrid.local.unwrap().source, AnalysisSource::Local);
        }
        AnalysisOutcome::Single(_) => panic!("expected a hybrid outcome"),
    }
    assert_eq!(hosted.calls.load(Ordering::SeqCst), 1);
    assert_eq!(local.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hybrid_tolerates_one_backend_failing() {
    let hosted: Arc<dyn CommitAnalyzer> = Arc::new(FailingAnalyzer {
        source: AnalysisSource::Hosted,
    });
    let local = local_stub("📝 SUMMARY: from local");
    let router = AnalysisRouter::new(Some(hosted), Some(local), true);

    let outcome = router
        .analyze_diff(DIFF, "msg", Some(AnalysisMode::Hybrid))
        .await
        .unwrap();
    match outcome {
        AnalysisOutcome::Hybrid(hybrid) => {
            assert!(hybrid.hosted.is_none());
            assert_eq!(hybrid.summary, "from local");
        }
        AnalysisOutcome::Single(_) => panic!("expected a hybrid outcome"),
    }
}

#[tokio::test]
async fn hybrid_with_every_backend_failing_is_unavailable() {
    let hosted: Arc<dyn CommitAnalyzer> = Arc::new(FailingAnalyzer {
        source: AnalysisSource::Hosted,
    });
    let local: Arc<dyn CommitAnalyzer> = Arc::new(FailingAnalyzer {
        source: AnalysisSource::Local,
    });
    let router = AnalysisRouter::new(Some(hosted), Some(local), true);

    let outcome = router
        .analyze_diff(DIFF, "msg", Some(AnalysisMode::Hybrid))
        .await;
    assert!(outcome.is_none());
}

#[tokio::test]
async fn hybrid_mode_is_unavailable_for_security_and_quality() {
    let hosted = hosted_stub("No issues found.");
    let local = local_stub("Score: 8");
    let router = AnalysisRouter::new(Some(hosted), Some(local), true);

    assert!(
        router
            .analyze_security(DIFF, Some(AnalysisMode::Hybrid))
            .await
            .is_none()
    );
    assert!(
        router
            .quality_score(DIFF, "msg", Some(AnalysisMode::Hybrid))
            .await
            .is_none()
    );
}

#[tokio::test]
async fn quality_score_is_extracted_through_dispatch() {
    let local = local_stub("Solid commit overall.\nScore: 8\nKeep it up.");
    let router = AnalysisRouter::new(None, Some(local), true);

    let result = router.quality_score(DIFF, "msg", None).await.unwrap();
    assert_eq!(result.score, Some(8));
    assert_eq!(result.source, AnalysisSource::Local);
}

#[tokio::test]
async fn kind_dispatch_routes_review_requests() {
    let local = local_stub(
        "📝 SUMMARY: Adds retry logic\n\
         ⚠️ IMPACT: Low\n\
         ✅ STRENGTHS: Covered by tests\n\
         🔍 CONCERNS: None\n\
         💡 REVIEW: APPROVE",
    );
    let router = AnalysisRouter::new(None, Some(local), true);
    let request = AnalysisRequest::new(DIFF, "Add retry", AnalysisKind::Review);

    let report = router.analyze(&request, None).await.unwrap();
    match report {
        commitlens::router::AnalysisReport::Review(outcome) => {
            let result = single(outcome);
            assert_eq!(result.summary, "Adds retry logic");
            assert_eq!(result.impact, "Low");
            assert_eq!(result.strengths, "Covered by tests");
            assert_eq!(result.concerns, "None");
            assert_eq!(result.recommendation, "APPROVE");
            assert!(result.raw_text.contains("SUMMARY"));
        }
        other => panic!("unexpected report: {other:?}"),
    }
}
