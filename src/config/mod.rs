//! Configuration loading and layering.
//!
//! Handles `.cpd-reply.toml` loading, environment variable resolution,
//! and CLI flag merging with proper priority ordering.

pub mod loader;

pub use loader::{BotConfig, Config, ConfigError, GithubConfig, ProviderConfig, ReplyConfig};
