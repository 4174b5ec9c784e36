//! Hosted chat-completion backend.
//!
//! Wraps an OpenAI-style `/chat/completions` endpoint. Requires an API
//! key at construction — without one the backend is simply never built,
//! rather than existing in a permanently-broken state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::HostedConfig;
use crate::models::{AnalysisResult, AnalysisSource, QualityResult, SecurityResult};

use super::sections::{extract_score, parse_sections};
use super::truncate::truncate_diff;
use super::{AnalyzerError, CommitAnalyzer};

/// Response length caps per operation (generated tokens).
const REVIEW_MAX_TOKENS: u32 = 500;
const SECURITY_MAX_TOKENS: u32 = 300;
const QUALITY_MAX_TOKENS: u32 = 300;

/// Low temperature for consistent analysis.
const TEMPERATURE: f32 = 0.3;

/// Commit analysis over the hosted chat-completion API.
pub struct HostedAnalyzer {
    client: reqwest::Client,
    config: HostedConfig,
}

impl HostedAnalyzer {
    /// Create the backend. Fails when no API key is configured.
    pub fn new(config: HostedConfig, client: reqwest::Client) -> Result<Self, AnalyzerError> {
        if config.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(AnalyzerError::NotConfigured(format!(
                "no API key for the hosted backend. Set {}.",
                crate::constants::ENV_OPENAI_API_KEY
            )));
        }
        info!(model = %config.model, "hosted analyzer initialized");
        Ok(Self { client, config })
    }

    /// One chat completion: system + user message, bounded timeout and
    /// response length. Returns the raw completion text.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, AnalyzerError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        debug!(%url, model = %self.config.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or(""))
            .json(&body)
            .timeout(self.config.timeout())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::Http { status });
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalyzerError::EmptyResponse);
        }
        Ok(text)
    }

    fn bounded_diff(&self, diff: &str) -> String {
        truncate_diff(diff, self.config.max_diff_chars)
    }
}

#[async_trait]
impl CommitAnalyzer for HostedAnalyzer {
    async fn analyze_diff(
        &self,
        diff: &str,
        commit_message: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let diff = self.bounded_diff(diff);
        let prompt = review_prompt(&diff, commit_message);

        info!("analyzing commit with hosted model");
        let reply = self
            .complete(
                "You are a code review expert. Analyze code changes and provide \
                 concise summaries. Be brief and technical.",
                &prompt,
                REVIEW_MAX_TOKENS,
            )
            .await?;

        Ok(parse_sections(&reply).into_result(self.source(), &self.config.model, reply.clone()))
    }

    async fn analyze_security(&self, diff: &str) -> Result<SecurityResult, AnalyzerError> {
        let diff = self.bounded_diff(diff);
        let prompt = security_prompt(&diff);

        let reply = self
            .complete(
                "You are a security expert. Analyze code for vulnerabilities and \
                 provide security recommendations.",
                &prompt,
                SECURITY_MAX_TOKENS,
            )
            .await?;

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

        let reply = self
            .complete(
                "You are a code quality expert. Rate commits on quality criteria.",
                &prompt,
                QUALITY_MAX_TOKENS,
            )
            .await?;

        Ok(QualityResult {
            analysis: reply.clone(),
            score: extract_score(&reply),
            raw_text: reply,
            source: self.source(),
            model: self.config.model.clone(),
        })
    }

    fn source(&self) -> AnalysisSource {
        AnalysisSource::Hosted
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

fn review_prompt(diff: &str, commit_message: &str) -> String {
    format!(
        "Analyze this code change and provide a brief summary.\n\n\
         Commit Message:\n{commit_message}\n\n\
         Code Diff:\n{diff}\n\n\
         Provide analysis in this format:\n\
         🆕 SUMMARY: One sentence summary of what changed\n\
         ✏️ IMPACT: 1-2 lines about the impact\n\
         ✅ STRENGTHS: 1-2 positive aspects of this change\n\
         ⚠️ CONCERNS: Potential issues (if any), or \"None\" if code looks good\n\
         👨‍💻 REVIEW: Quick recommendation (APPROVE/REVIEW/REJECT)\n\n\
         Keep it concise and technical."
    )
}

fn security_prompt(diff: &str) -> String {
    format!(
        "Analyze this code change for security issues.\n\n\
         Code Diff:\n{diff}\n\n\
         Provide:\n\
         1. 🔐 SECURITY: Any security vulnerabilities (or \"None found\")\n\
         2. 🔍 RECOMMENDATIONS: Security best practices that should be applied\n\
         3. ⚠️ RISK LEVEL: LOW/MEDIUM/HIGH\n\n\
         Be concise and specific."
    )
}

fn quality_prompt(diff: &str, commit_message: &str) -> String {
    format!(
        "Rate the quality of this commit (1-10).\n\n\
         Commit Message:\n{commit_message}\n\n\
         Code Diff:\n{diff}\n\n\
         Provide:\n\
         1. 🎯 SCORE: Quality score 1-10\n\
         2. 📊 BREAKDOWN:\n\
            - Code quality: 1-10\n\
            - Test coverage: 1-10\n\
            - Commit message: 1-10\n\
         3. 🚀 OVERALL: Brief assessment"
    )
}

/// Chat-completion request payload.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
