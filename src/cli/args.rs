//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use cpd_reply::models::{Evaluation, RoleStrategy};

/// Reply to developer comments on code-review suggestions.
#[derive(Parser, Debug)]
#[command(name = "cpd-reply", version = cpd_reply::constants::VERSION)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Reply to a review comment (GitHub Action entry point).
    Reply(ReplyArgs),

    /// Evaluate a comment against a saved list of review comments, offline.
    Inspect(InspectArgs),

    /// Print version and build information.
    Version,
}

/// Arguments for the `reply` subcommand.
#[derive(Parser, Debug)]
pub struct ReplyArgs {
    /// Id of the review comment that triggered the run.
    /// Falls back to INPUT_COMMENT_ID, then the event's `comment.id`.
    #[arg(long)]
    pub comment_id: Option<u64>,

    /// GitHub event payload (default: $GITHUB_EVENT_PATH).
    #[arg(long)]
    pub event_path: Option<PathBuf>,

    /// Repository as owner/repo (default: $GITHUB_REPOSITORY).
    #[arg(long)]
    pub repository: Option<String>,

    /// Pull request number (default: read from the event payload).
    #[arg(long)]
    pub pull_number: Option<u64>,

    /// Generate the reply and print it without posting.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// JSON array of review comments, as returned by the GitHub API.
    #[arg(long)]
    pub comments_file: PathBuf,

    /// Id of the comment to evaluate.
    #[arg(long)]
    pub comment_id: u64,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Override the bot login.
    #[arg(long)]
    pub bot_login: Option<String>,

    /// Override the role assignment strategy.
    #[arg(long)]
    pub roles: Option<RoleStrategy>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render an evaluation using the renderer for this format.
    pub fn render(&self, evaluation: &Evaluation) -> String {
        use cpd_reply::output::OutputRenderer;
        match self {
            OutputFormat::Terminal => cpd_reply::output::terminal::TerminalRenderer.render(evaluation),
            OutputFormat::Json => cpd_reply::output::json::JsonRenderer.render(evaluation),
        }
    }
}
