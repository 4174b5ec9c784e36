//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and backend defaults so a rename only requires changing this file.

use std::time::Duration;

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "commitlens";

/// Local config filename (e.g. `.commitlens.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".commitlens.toml";

/// Directory name under `~/.config/` for the global config.
pub const CONFIG_DIR: &str = "commitlens";

/// Marker appended when a diff is cut at a backend's size limit.
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_PREFER_FAST: &str = "COMMITLENS_PREFER_FAST";

// ── Hosted backend defaults ─────────────────────────────────────────

pub const DEFAULT_HOSTED_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HOSTED_MODEL: &str = "gpt-4o-mini";
/// Hosted context windows are large; latency is the real budget.
pub const DEFAULT_HOSTED_MAX_DIFF_CHARS: usize = 8000;
pub const DEFAULT_HOSTED_TIMEOUT: Duration = Duration::from_secs(30);

// ── Local backend defaults ──────────────────────────────────────────

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_LOCAL_MODEL: &str = "mistral";
/// Smaller cap for self-hosted models: tighter context windows and
/// much slower prompt ingestion than the hosted API.
pub const DEFAULT_LOCAL_MAX_DIFF_CHARS: usize = 4000;
pub const DEFAULT_LOCAL_TIMEOUT: Duration = Duration::from_secs(60);

// ── GitHub defaults ─────────────────────────────────────────────────

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_TIMEOUT: Duration = Duration::from_secs(10);
