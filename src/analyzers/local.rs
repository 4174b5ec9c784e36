//! Self-hosted model backend.
//!
//! Wraps an Ollama-style `/api/generate` endpoint: single prompt string,
//! `stream` forced off, sampling parameters inline. Construction probes
//! the server and verifies the configured model is installed, so an
//! unreachable host means the backend is never built.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::LocalConfig;
use crate::models::{AnalysisResult, AnalysisSource, QualityResult, SecurityResult};

use super::sections::{extract_score, parse_sections};
use super::truncate::truncate_diff;
use super::{AnalyzerError, CommitAnalyzer};

/// Response length caps per operation (generated tokens). Tighter than
/// the hosted backend: self-hosted inference is slow.
const REVIEW_NUM_PREDICT: u32 = 400;
const SECURITY_NUM_PREDICT: u32 = 250;
const QUALITY_NUM_PREDICT: u32 = 200;

const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;

/// The health probe should answer fast even when generation is busy.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Commit analysis over a self-hosted model server.
pub struct LocalAnalyzer {
    client: reqwest::Client,
    config: LocalConfig,
}

impl LocalAnalyzer {
    /// Probe the server and verify the model, then build the backend.
    ///
    /// A failed probe or a missing model yields an error and no backend;
    /// availability is decided here, not per call.
    pub async fn connect(
        config: LocalConfig,
        client: reqwest::Client,
    ) -> Result<Self, AnalyzerError> {
        let url = format!("{}/api/tags", config.host.trim_end_matches('/'));
        let response = client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::Http { status });
        }

        let tags: TagsResponse = response.json().await?;
        let installed = tags.models.iter().any(|m| {
            m.name == config.model
                || m.name
                    .split_once(':')
                    .is_some_and(|(base, _)| base == config.model)
        });
        if !installed {
            let available: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();
            warn!(model = %config.model, ?available, "model not installed on local server");
            return Err(AnalyzerError::NotConfigured(format!(
                "model '{}' not found on {}. Install with: ollama pull {}",
                config.model, config.host, config.model
            )));
        }

        info!(model = %config.model, host = %config.host, "local analyzer initialized");
        Ok(Self { client, config })
    }

    /// One generation call under this backend's timeout. Returns the raw
    /// generated text.
    async fn generate(&self, prompt: &str, num_predict: u32) -> Result<String, AnalyzerError> {
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            num_predict,
        };

        let url = format!("{}/api/generate", self.config.host.trim_end_matches('/'));
        debug!(%url, model = %self.config.model, "sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.config.timeout())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::Http { status });
        }

        let parsed: GenerateResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(AnalyzerError::EmptyResponse);
        }
        Ok(parsed.response)
    }

    fn bounded_diff(&self, diff: &str) -> String {
        truncate_diff(diff, self.config.max_diff_chars)
    }
}

#[async_trait]
impl CommitAnalyzer for LocalAnalyzer {
    async fn analyze_diff(
        &self,
        diff: &str,
        commit_message: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let diff = self.bounded_diff(diff);
        let prompt = review_prompt(&diff, commit_message);

        info!(model = %self.config.model, "analyzing commit with local model");
        let reply = self.generate(&prompt, REVIEW_NUM_PREDICT).await?;

        Ok(parse_sections(&reply).into_result(self.source(), &self.config.model, reply.clone()))
    }

    async fn analyze_security(&self, diff: &str) -> Result<SecurityResult, AnalyzerError> {
        let diff = self.bounded_diff(diff);
        let prompt = security_prompt(&diff);

        let reply = self.generate(&prompt, SECURITY_NUM_PREDICT).await?;

        Ok(SecurityResult {
            analysis: reply.clone(),
            raw_text: reply,
            source: self.source(),
            model: self.config.model.clone(),
        })
    }

    async fn quality_score(
        &self,
        diff: &str,
        commit_message: &str,
    ) -> Result<QualityResult, AnalyzerError> {
        let diff = self.bounded_diff(diff);
        let prompt = quality_prompt(&diff, commit_message);

        let reply = self.generate(&prompt, QUALITY_NUM_PREDICT).await?;

        Ok(QualityResult {
            analysis: reply.clone(),
            score: extract_score(&reply),
            raw_text: reply,
            source: self.source(),
            model: self.config.model.clone(),
        })
    }

    fn source(&self) -> AnalysisSource {
        AnalysisSource::Local
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }

    fn host(&self) -> Option<&str> {
        Some(&self.config.host)
    }
}

/// Prompts are shorter than the hosted backend's: small models follow
/// terse instructions better and every prompt token costs latency.
fn review_prompt(diff: &str, commit_message: &str) -> String {
    format!(
        "Analyze this code change. Keep the response brief.\n\n\
         Commit: {commit_message}\n\n\
         Code Diff:\n{diff}\n\n\
         Provide analysis in this format:\n\
         🔍 SUMMARY: One sentence summary\n\
         ✏️ IMPACT: 1 line about impact\n\
         ✅ STRENGTHS: 1 line positive aspects\n\
         ⚠️ CONCERNS: Issues or \"None\"\n\
         👨‍💻 REVIEW: APPROVE/REVIEW/REJECT with reason\n\n\
         Be concise and technical."
    )
}

fn security_prompt(diff: &str) -> String {
    format!(
        "Analyze this code for security issues. Be brief.\n\n\
         Code Diff:\n{diff}\n\n\
         Provide:\n\
         1. 🔐 SECURITY: Any vulnerabilities (or \"None found\")\n\
         2. 🔍 RECOMMENDATIONS: 1-2 security best practices\n\
         3. ⚠️ RISK LEVEL: LOW/MEDIUM/HIGH\n\n\
         Be concise."
    )
}

fn quality_prompt(diff: &str, commit_message: &str) -> String {
    format!(
        "Rate commit quality (1-10). Be brief.\n\n\
         Commit: {commit_message}\n\n\
         Code Diff:\n{diff}\n\n\
         Provide:\n\
         1. 🎯 SCORE: Quality score 1-10\n\
         2. 📊 ASSESSMENT: 1-2 line assessment\n\n\
         Be concise."
    )
}

/// Generation request payload. `stream` is always false: the contract
/// with this transport is one prompt in, one text field back.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}
