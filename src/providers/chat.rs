//! Chat-completion provider over `reqwest`.
//!
//! Supports the Azure OpenAI deployment endpoint (the default) and any
//! OpenAI-compatible `/chat/completions` API. Both share the same request
//! and response bodies; only the URL and the auth header differ.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::constants;
use crate::models::{PromptMessage, ProviderName};

use super::{ProviderError, ReplyProvider};

/// Maximum length of response text to include in parse error messages.
const PARSE_ERROR_PREVIEW_LEN: usize = 500;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    max_tokens: u32,
    temperature: f32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion backed reply provider.
pub struct ChatProvider {
    name: ProviderName,
    endpoint: String,
    api_key: String,
    deployment: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl ChatProvider {
    /// Create a provider from configuration.
    ///
    /// Fails with [`ProviderError::NotConfigured`] when the key, endpoint or
    /// deployment is missing.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "no API key found for provider '{}'. Set {}.",
                config.name,
                constants::ENV_API_KEY
            ))
        })?;
        let deployment = config.deployment.clone().ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "no deployment/model set for provider '{}'. Set {} or [provider] deployment.",
                config.name,
                constants::ENV_DEPLOYMENT
            ))
        })?;
        let base_url = match (&config.base_url, config.name) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, ProviderName::OpenAI) => "https://api.openai.com/v1".to_string(),
            (None, ProviderName::Azure) => {
                return Err(ProviderError::NotConfigured(format!(
                    "no endpoint set for provider 'azure'. Set {} or [provider] base_url.",
                    constants::ENV_BASE_URL
                )));
            }
        };

        let endpoint = match config.name {
            ProviderName::Azure => format!(
                "{base_url}/openai/deployments/{deployment}/chat/completions?api-version={}",
                config.api_version
            ),
            ProviderName::OpenAI => format!("{base_url}/chat/completions"),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ApiError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: config.name,
            endpoint,
            api_key,
            deployment,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    /// The fully-resolved chat-completion URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReplyProvider for ChatProvider {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ProviderError> {
        let payload = ChatRequest {
            model: &self.deployment,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            n: 1,
        };

        let request = self.client.post(&self.endpoint).json(&payload);
        let request = match self.name {
            ProviderName::Azure => request.header("api-key", &self.api_key),
            ProviderName::OpenAI => request.bearer_auth(&self.api_key),
        };

        tracing::debug!(
            provider = %self.name,
            messages = messages.len(),
            "requesting chat completion"
        );

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::ApiError(format!("{} request failed: {e}", self.name)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::ApiError(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ProviderError::ApiError(format!(
                "{} returned HTTP {status}: {}",
                self.name,
                preview(&text)
            )));
        }

        parse_completion(&text)
    }
}

/// Extract `choices[0].message.content` from a chat-completion body.
///
/// A `null` content is treated as an empty reply.
fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("{e}. Response: {}", preview(body))))?;

    let choice = parsed.choices.into_iter().next().ok_or_else(|| {
        ProviderError::ParseError(format!("no choices in response: {}", preview(body)))
    })?;

    Ok(choice.message.content.unwrap_or_default())
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(PARSE_ERROR_PREVIEW_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
