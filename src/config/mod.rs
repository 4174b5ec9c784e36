//! Configuration loading and layering.
//!
//! Handles `.commitlens.toml` loading, environment variable resolution,
//! and default merging with proper priority ordering.

pub mod loader;

pub use loader::{AnalysisConfig, Config, GithubConfig, HostedConfig, LocalConfig};
