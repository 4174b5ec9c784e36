//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. Environment variables
//! 2. `.commitlens.toml` in the working directory
//! 3. `~/.config/commitlens/config.toml` (global defaults)
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::constants;
use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub hosted: HostedConfig,
    pub local: LocalConfig,
    pub github: GithubConfig,
}

/// Dispatch-policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// In AUTO mode, prefer the faster local model when it is available.
    pub prefer_fast: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { prefer_fast: true }
    }
}

/// Hosted chat-completion backend configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Max diff characters transmitted to this backend.
    pub max_diff_chars: usize,
}

impl HostedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for HostedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_diff_chars", &self.max_diff_chars)
            .finish()
    }
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            model: constants::DEFAULT_HOSTED_MODEL.to_string(),
            base_url: constants::DEFAULT_HOSTED_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: constants::DEFAULT_HOSTED_TIMEOUT.as_secs(),
            max_diff_chars: constants::DEFAULT_HOSTED_MAX_DIFF_CHARS,
        }
    }
}

/// Self-hosted backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub host: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Max diff characters transmitted to this backend. Smaller than the
    /// hosted cap: different context-window and latency budget.
    pub max_diff_chars: usize,
}

impl LocalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_OLLAMA_HOST.to_string(),
            model: constants::DEFAULT_LOCAL_MODEL.to_string(),
            timeout_secs: constants::DEFAULT_LOCAL_TIMEOUT.as_secs(),
            max_diff_chars: constants::DEFAULT_LOCAL_MAX_DIFF_CHARS,
        }
    }
}

/// GitHub access configuration (collaborator, not core).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl GithubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_GITHUB_API_URL.to_string(),
            token: None,
            timeout_secs: constants::DEFAULT_GITHUB_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, then working-directory config, then
    /// applies environment variable overrides.
    pub fn load(working_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 3: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 2: local config
        if let Some(dir) = working_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 1: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for
    /// non-default values).
    fn merge(&mut self, other: Config) {
        // Analysis settings (prefer_fast=false overrides the default true)
        if !other.analysis.prefer_fast {
            self.analysis.prefer_fast = false;
        }

        // Hosted backend
        let hosted_default = HostedConfig::default();
        if other.hosted.model != hosted_default.model {
            self.hosted.model = other.hosted.model;
        }
        if other.hosted.base_url != hosted_default.base_url {
            self.hosted.base_url = other.hosted.base_url;
        }
        if other.hosted.api_key.is_some() {
            self.hosted.api_key = other.hosted.api_key;
        }
        if other.hosted.timeout_secs != hosted_default.timeout_secs {
            self.hosted.timeout_secs = other.hosted.timeout_secs;
        }
        if other.hosted.max_diff_chars != hosted_default.max_diff_chars {
            self.hosted.max_diff_chars = other.hosted.max_diff_chars;
        }

        // Local backend
        let local_default = LocalConfig::default();
        if other.local.host != local_default.host {
            self.local.host = other.local.host;
        }
        if other.local.model != local_default.model {
            self.local.model = other.local.model;
        }
        if other.local.timeout_secs != local_default.timeout_secs {
            self.local.timeout_secs = other.local.timeout_secs;
        }
        if other.local.max_diff_chars != local_default.max_diff_chars {
            self.local.max_diff_chars = other.local.max_diff_chars;
        }

        // GitHub
        let github_default = GithubConfig::default();
        if other.github.api_url != github_default.api_url {
            self.github.api_url = other.github.api_url;
        }
        if other.github.token.is_some() {
            self.github.token = other.github.token;
        }
        if other.github.timeout_secs != github_default.timeout_secs {
            self.github.timeout_secs = other.github.timeout_secs;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_OPENAI_API_KEY) {
            self.hosted.api_key = Some(val);
        }
        if let Ok(val) = env.var(constants::ENV_OPENAI_MODEL) {
            self.hosted.model = val;
        }
        if let Ok(val) = env.var(constants::ENV_OLLAMA_HOST) {
            self.local.host = val;
        }
        if let Ok(val) = env.var(constants::ENV_OLLAMA_MODEL) {
            self.local.model = val;
        }
        if let Ok(val) = env.var(constants::ENV_GITHUB_TOKEN) {
            self.github.token = Some(val);
        }
        if let Ok(val) = env.var(constants::ENV_PREFER_FAST) {
            match val.to_lowercase().as_str() {
                "false" | "0" | "no" | "off" => self.analysis.prefer_fast = false,
                "true" | "1" | "yes" | "on" => self.analysis.prefer_fast = true,
                _ => warn!(
                    "ignoring invalid {} value: {val}",
                    constants::ENV_PREFER_FAST
                ),
            }
        }
    }
}
