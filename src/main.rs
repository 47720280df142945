//! cpd-reply — answers developer replies to code-review bot suggestions.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use cpd_reply::config;
use cpd_reply::constants;
use cpd_reply::env;
use cpd_reply::evaluator;
use cpd_reply::github;
use cpd_reply::models;
use cpd_reply::orchestrator;
use cpd_reply::providers;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, InspectArgs, ReplyArgs};
use config::Config;
use env::Env;
use evaluator::EvaluationOptions;
use github::{GitHubClient, RepoSlug};
use models::{Comment, PullRequestEvent};
use orchestrator::{ReplyOrchestrator, ReplyOutcome, ReplyRequest};
use providers::chat::ChatProvider;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Reply(args) => run_reply(args).await,
        Command::Inspect(args) => run_inspect(args),
        Command::Version => run_version(),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "cpd_reply=debug" } else { "cpd_reply=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print detailed version and build information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}

/// The directory local config is read from.
fn workspace_root(env: &Env) -> Option<PathBuf> {
    env.non_empty(constants::ENV_GITHUB_WORKSPACE)
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
}

/// Evaluate a comment against a saved comment dump, without network access.
fn run_inspect(args: InspectArgs) -> Result<()> {
    let env = Env::real();
    let config = Config::load(workspace_root(&env).as_deref(), &env)
        .context("failed to load configuration")?;

    let content = std::fs::read_to_string(&args.comments_file)
        .with_context(|| format!("failed to read {}", args.comments_file.display()))?;
    let comments: Vec<Comment> = serde_json::from_str(&content).with_context(|| {
        format!(
            "failed to parse {} as a JSON array of review comments",
            args.comments_file.display()
        )
    })?;

    let mut options = EvaluationOptions::from_config(&config);
    if let Some(login) = args.bot_login {
        options.bot_login = login;
    }
    if let Some(roles) = args.roles {
        options.roles = roles;
    }

    let evaluation = evaluator::evaluate(&comments, args.comment_id, &options);
    print!("{}", args.format.render(&evaluation));
    Ok(())
}

/// Full run: fetch comments, evaluate, ask the model, post the reply.
async fn run_reply(args: ReplyArgs) -> Result<()> {
    let env = Env::real();
    let config = Config::load(workspace_root(&env).as_deref(), &env)
        .context("failed to load configuration")?;

    let event_path = args
        .event_path
        .or_else(|| env.non_empty(constants::ENV_GITHUB_EVENT_PATH).map(PathBuf::from));
    let event = match event_path {
        Some(path) => Some(PullRequestEvent::load(&path)?),
        None => None,
    };

    let repository = args
        .repository
        .or_else(|| config.github.repository.clone())
        .with_context(|| {
            format!(
                "no repository given. Pass --repository or set {}",
                constants::ENV_GITHUB_REPOSITORY
            )
        })?;
    let repo: RepoSlug = repository.parse()?;

    let pull_number = match (args.pull_number, &event) {
        (Some(n), _) => n,
        (None, Some(event)) => event.pull_number()?,
        (None, None) => bail!(
            "no pull request number. Pass --pull-number or run on a pull request event ({})",
            constants::ENV_GITHUB_EVENT_PATH
        ),
    };

    let Some(comment_id) = orchestrator::resolve_comment_id(args.comment_id, &env, event.as_ref())
    else {
        bail!(
            "no comment id. Pass --comment-id, set {} or run on a pull_request_review_comment event",
            constants::ENV_COMMENT_ID
        );
    };

    let github = GitHubClient::new(&config.github.api_url, config.github.token.as_deref())?;
    let provider = ChatProvider::new(&config.provider)?;

    let runner = ReplyOrchestrator::new(
        Arc::new(github),
        Arc::new(provider),
        EvaluationOptions::from_config(&config),
        config.reply.post_empty,
    );

    let request = ReplyRequest {
        repo,
        pull_number,
        comment_id,
        dry_run: args.dry_run,
    };
    tracing::info!(
        repository = %request.repo,
        pull_number,
        comment_id,
        "evaluating comment"
    );

    let outcome = runner
        .run(&request)
        .await
        .context("reply run failed")?;

    if let ReplyOutcome::DryRun { ref body } = outcome {
        println!("{body}");
    }
    eprintln!("{}", cli::status_line(&outcome));

    if outcome.is_failure() {
        bail!("{outcome}");
    }
    Ok(())
}
