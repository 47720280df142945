//! Reply orchestrator: fetch comments, evaluate, call the model, post.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::evaluator::{self, EvaluationOptions};
use crate::github::{GithubError, RepoSlug, ReviewCommentApi};
use crate::models::{Evaluation, PullRequestEvent, SkipReason};
use crate::providers::ReplyProvider;

/// Errors from the orchestrator.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("GitHub error: {0}")]
    Github(#[from] GithubError),
}

/// What to reply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub repo: RepoSlug,
    pub pull_number: u64,
    pub comment_id: u64,
    /// Generate the reply but do not post it.
    pub dry_run: bool,
}

/// Pick the triggering comment id.
///
/// Order: explicit flag, the `INPUT_COMMENT_ID` action input, then the
/// event payload's `comment.id`.
pub fn resolve_comment_id(
    flag: Option<u64>,
    env: &Env,
    event: Option<&PullRequestEvent>,
) -> Option<u64> {
    if flag.is_some() {
        return flag;
    }
    if let Some(raw) = env.non_empty(constants::ENV_COMMENT_ID) {
        match raw.trim().parse::<u64>() {
            Ok(id) => return Some(id),
            Err(_) => tracing::warn!(
                "ignoring invalid {} value: {raw}",
                constants::ENV_COMMENT_ID
            ),
        }
    }
    event.and_then(PullRequestEvent::comment_id)
}

/// Result of a single run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The comment is not an eligible reply; no model call was made.
    Skipped(SkipReason),
    /// The model call failed; nothing was posted.
    ModelFailed(String),
    /// The model returned only whitespace; nothing was posted.
    EmptyReply,
    /// Dry run: the reply that would have been posted.
    DryRun { body: String },
    /// The reply was posted.
    Posted { reply_id: u64, body: String },
}

impl ReplyOutcome {
    /// Whether the run should be reported as a failure (non-zero exit).
    pub fn is_failure(&self) -> bool {
        matches!(self, ReplyOutcome::ModelFailed(_))
    }
}

impl fmt::Display for ReplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
            ReplyOutcome::ModelFailed(msg) => write!(f, "model call failed: {msg}"),
            ReplyOutcome::EmptyReply => write!(f, "model returned an empty reply, nothing posted"),
            ReplyOutcome::DryRun { .. } => write!(f, "dry run, reply not posted"),
            ReplyOutcome::Posted { reply_id, .. } => write!(f, "posted reply {reply_id}"),
        }
    }
}

/// Drives one reply run against the GitHub API and a chat provider.
pub struct ReplyOrchestrator {
    github: Arc<dyn ReviewCommentApi>,
    provider: Arc<dyn ReplyProvider>,
    options: EvaluationOptions,
    post_empty: bool,
}

impl ReplyOrchestrator {
    pub fn new(
        github: Arc<dyn ReviewCommentApi>,
        provider: Arc<dyn ReplyProvider>,
        options: EvaluationOptions,
        post_empty: bool,
    ) -> Self {
        Self {
            github,
            provider,
            options,
            post_empty,
        }
    }

    /// Run the full pipeline for one triggering comment.
    ///
    /// GitHub failures are returned as errors. A model failure is an
    /// outcome so the caller can report it alongside the evaluation.
    pub async fn run(&self, request: &ReplyRequest) -> Result<ReplyOutcome, OrchestratorError> {
        let comments = self
            .github
            .list_review_comments(&request.repo, request.pull_number)
            .await?;

        let actionable = match evaluator::evaluate(&comments, request.comment_id, &self.options) {
            Evaluation::Actionable(actionable) => actionable,
            Evaluation::Skipped(reason) => return Ok(ReplyOutcome::Skipped(reason)),
        };

        let body = match self.provider.complete(&actionable.messages).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "model call failed");
                return Ok(ReplyOutcome::ModelFailed(e.to_string()));
            }
        };

        if body.trim().is_empty() && !self.post_empty {
            tracing::warn!(comment_id = request.comment_id, "model returned an empty reply");
            return Ok(ReplyOutcome::EmptyReply);
        }

        if request.dry_run {
            return Ok(ReplyOutcome::DryRun { body });
        }

        let reply_id = self
            .github
            .create_reply(&request.repo, request.pull_number, request.comment_id, &body)
            .await?;
        tracing::info!(comment_id = request.comment_id, reply_id, "posted reply");

        Ok(ReplyOutcome::Posted { reply_id, body })
    }
}
