//! Chat prompt types handed to the completion provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversational role of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single role-tagged message in the model input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// How thread comments are mapped to conversational roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleStrategy {
    /// Even thread positions are the assistant, odd positions the user.
    #[default]
    Positional,
    /// The bot's comments are the assistant, everyone else the user.
    Authorship,
}

impl fmt::Display for RoleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleStrategy::Positional => write!(f, "positional"),
            RoleStrategy::Authorship => write!(f, "authorship"),
        }
    }
}

impl std::str::FromStr for RoleStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" => Ok(RoleStrategy::Positional),
            "authorship" => Ok(RoleStrategy::Authorship),
            other => Err(format!(
                "unsupported role strategy: '{other}'. Supported: positional, authorship"
            )),
        }
    }
}
