//! Shared types used across all modules.
//!
//! This module defines the core data structures for review comments,
//! threads, prompt messages, evaluation results, and event payloads.
//! Other modules import from here rather than reaching into each other's
//! internals.

pub mod comment;
pub mod evaluation;
pub mod event;
pub mod prompt;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use comment::{Comment, CommentThread, User};
pub use evaluation::{ActionableThread, Evaluation, SkipReason};
pub use event::PullRequestEvent;
pub use prompt::{PromptMessage, Role, RoleStrategy};

/// Login of the suggestion bot whose comments are being replied to.
pub const DEFAULT_BOT_LOGIN: &str = "copilot-defender";

/// Supported chat-completion backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    /// Azure OpenAI deployment endpoint (`api-key` header, `api-version` query).
    #[default]
    Azure,
    /// OpenAI or any OpenAI-compatible `/chat/completions` endpoint.
    #[serde(rename = "openai")]
    OpenAI,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Azure => write!(f, "azure"),
            ProviderName::OpenAI => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "azure" => Ok(ProviderName::Azure),
            "openai" => Ok(ProviderName::OpenAI),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: azure, openai"
            )),
        }
    }
}
