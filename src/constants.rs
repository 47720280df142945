//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and URLs so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "cpd-reply";

/// Crate version, as reported by `cpd-reply version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple, exported by `build.rs`.
pub const TARGET: &str = env!("TARGET");

/// Local config filename (e.g. `.cpd-reply.toml` in the workspace root).
pub const CONFIG_FILENAME: &str = ".cpd-reply.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "cpd-reply";

/// Default GitHub REST API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Azure OpenAI REST API version used for chat completions.
pub const AZURE_API_VERSION: &str = "2023-03-15-preview";

/// `User-Agent` header sent to GitHub (required by the REST API).
pub const USER_AGENT: &str = concat!("cpd-reply/", env!("CARGO_PKG_VERSION"));

// ── Environment variable names ──────────────────────────────────────

// Provided by the GitHub Actions runner.
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const ENV_GITHUB_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_GITHUB_WORKSPACE: &str = "GITHUB_WORKSPACE";
pub const ENV_COMMENT_ID: &str = "INPUT_COMMENT_ID";

pub const ENV_GITHUB_TOKEN: &str = "CPD_GITHUB_TOKEN";
pub const ENV_GITHUB_TOKEN_FALLBACK: &str = "GITHUB_TOKEN";
pub const ENV_BOT_LOGIN: &str = "CPD_BOT_LOGIN";
pub const ENV_PROVIDER: &str = "CPD_PROVIDER";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_DEPLOYMENT: &str = "OPENAI_DEPLOYMENT_NAME";
pub const ENV_API_VERSION: &str = "OPENAI_API_VERSION";
