//! ReplyProvider trait and chat-completion integration.
//!
//! Decouples the orchestrator from the concrete chat-completion backend so
//! that tests can substitute a canned provider.

pub mod chat;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PromptMessage;

/// Errors from the reply provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for LLM-backed reply generation.
///
/// Implementations send the ordered message sequence to a chat-completion
/// endpoint and return the first choice's text verbatim.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ProviderError>;
}
