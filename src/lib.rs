//! commitlens — AI-assisted commit analysis CLI (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod analyzers;
pub mod config;
pub mod constants;
pub mod env;
pub mod github;
pub mod models;
pub mod output;
pub mod router;
