//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.cpd-reply.toml` in the workspace root
//! 4. `~/.config/cpd-reply/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::{DEFAULT_BOT_LOGIN, ProviderName, RoleStrategy};

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
    pub bot: BotConfig,
    pub github: GithubConfig,
    pub provider: ProviderConfig,
    pub reply: ReplyConfig,
}

/// Identity of the suggestion bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub login: String,
    /// Only use bot comments containing a ```suggestion block as the
    /// code-context source.
    pub require_suggestion: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            login: DEFAULT_BOT_LOGIN.to_string(),
            require_suggestion: false,
        }
    }
}

/// GitHub REST API access.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
    /// `owner/repo`.
    pub repository: Option<String>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("repository", &self.repository)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: constants::GITHUB_API_URL.to_string(),
            token: None,
            repository: None,
        }
    }
}

/// Chat-completion provider configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub base_url: Option<String>,
    /// Azure deployment name; also sent as the `model` field.
    pub deployment: Option<String>,
    pub api_version: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: ProviderName::Azure,
            base_url: None,
            deployment: None,
            api_version: constants::AZURE_API_VERSION.to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 1024,
            timeout_secs: 60,
        }
    }
}

/// Reply behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    pub roles: RoleStrategy,
    /// Post the model output even when it is empty.
    pub post_empty: bool,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, workspace-local config, then applies
    /// environment variable overrides.
    pub fn load(workspace: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: workspace-local config
        if let Some(root) = workspace {
            let local_path = root.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        tracing::debug!(?config, "configuration loaded");
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

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        // Bot settings
        let default_bot = BotConfig::default();
        if other.bot.login != default_bot.login {
            self.bot.login = other.bot.login;
        }
        if other.bot.require_suggestion {
            self.bot.require_suggestion = true;
        }

        // GitHub settings
        if other.github.api_url != GithubConfig::default().api_url {
            self.github.api_url = other.github.api_url;
        }
        if other.github.token.is_some() {
            self.github.token = other.github.token;
        }
        if other.github.repository.is_some() {
            self.github.repository = other.github.repository;
        }

        // Provider settings
        let default_provider = ProviderConfig::default();
        if other.provider.name != default_provider.name {
            self.provider.name = other.provider.name;
        }
        if other.provider.base_url.is_some() {
            self.provider.base_url = other.provider.base_url;
        }
        if other.provider.deployment.is_some() {
            self.provider.deployment = other.provider.deployment;
        }
        if other.provider.api_version != default_provider.api_version {
            self.provider.api_version = other.provider.api_version;
        }
        if other.provider.api_key.is_some() {
            self.provider.api_key = other.provider.api_key;
        }
        if other.provider.temperature != default_provider.temperature {
            self.provider.temperature = other.provider.temperature;
        }
        if other.provider.max_tokens != default_provider.max_tokens {
            self.provider.max_tokens = other.provider.max_tokens;
        }
        if other.provider.timeout_secs != default_provider.timeout_secs {
            self.provider.timeout_secs = other.provider.timeout_secs;
        }

        // Reply settings
        if other.reply.roles != RoleStrategy::default() {
            self.reply.roles = other.reply.roles;
        }
        if other.reply.post_empty {
            self.reply.post_empty = true;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.non_empty(constants::ENV_BOT_LOGIN) {
            self.bot.login = val;
        }

        if let Some(val) = env.non_empty(constants::ENV_GITHUB_API_URL) {
            self.github.api_url = val;
        }
        if let Some(val) = env.non_empty(constants::ENV_GITHUB_REPOSITORY) {
            self.github.repository = Some(val);
        }
        let token = env
            .non_empty(constants::ENV_GITHUB_TOKEN)
            .or_else(|| env.non_empty(constants::ENV_GITHUB_TOKEN_FALLBACK));
        if token.is_some() {
            self.github.token = token;
        }

        if let Some(val) = env.non_empty(constants::ENV_PROVIDER) {
            match val.parse::<ProviderName>() {
                Ok(name) => self.provider.name = name,
                Err(_) => tracing::warn!(
                    "ignoring invalid {} value: {val}",
                    constants::ENV_PROVIDER
                ),
            }
        }
        if let Some(val) = env.non_empty(constants::ENV_BASE_URL) {
            self.provider.base_url = Some(val);
        }
        if let Some(val) = env.non_empty(constants::ENV_DEPLOYMENT) {
            self.provider.deployment = Some(val);
        }
        if let Some(val) = env.non_empty(constants::ENV_API_VERSION) {
            self.provider.api_version = val;
        }
        if let Some(val) = env.non_empty(constants::ENV_API_KEY) {
            self.provider.api_key = Some(val);
        }
    }
}
