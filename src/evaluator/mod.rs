//! Decides whether a target comment gets an automated reply and, if so,
//! assembles the model input for it.
//!
//! Pure, in-memory, and synchronous: everything it needs is passed in
//! by the caller, who has already fetched the pull request's comments.

use crate::config::Config;
use crate::context;
use crate::models::{
    ActionableThread, Comment, CommentThread, DEFAULT_BOT_LOGIN, Evaluation, RoleStrategy,
    SkipReason,
};
use crate::prompt;
use crate::thread;

/// Marker the bot puts in comments that carry a code suggestion.
pub const SUGGESTION_MARKER: &str = "```suggestion";

/// Knobs for a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Login of the suggestion bot.
    pub bot_login: String,
    /// How thread comments map to conversational roles.
    pub roles: RoleStrategy,
    /// Only accept bot comments containing [`SUGGESTION_MARKER`] as the
    /// source of the code fragment.
    pub require_suggestion: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            bot_login: DEFAULT_BOT_LOGIN.to_string(),
            roles: RoleStrategy::default(),
            require_suggestion: false,
        }
    }
}

impl EvaluationOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bot_login: config.bot.login.clone(),
            roles: config.reply.roles,
            require_suggestion: config.bot.require_suggestion,
        }
    }
}

/// Find the bot comment whose diff hunk defines the code under discussion.
fn find_suggestion<'a>(thread: &'a CommentThread, options: &EvaluationOptions) -> Option<&'a Comment> {
    thread.iter().find(|c| {
        c.is_authored_by(&options.bot_login)
            && (!options.require_suggestion || c.body.contains(SUGGESTION_MARKER))
    })
}

fn evaluate_inner(
    comments: &[Comment],
    target_id: u64,
    options: &EvaluationOptions,
) -> Result<ActionableThread, SkipReason> {
    let thread = thread::reconstruct_thread(comments, target_id, &options.bot_login)?;
    thread::check_replies_to_bot(&thread, &options.bot_login)?;

    let suggestion = find_suggestion(&thread, options).ok_or(SkipReason::NoBotComment)?;
    let fragment = context::extract_code_fragment(suggestion)
        .map_err(|e| e.into_skip_reason(suggestion.id))?;
    let suggestion_id = suggestion.id;

    let messages = prompt::build_messages(&thread, &fragment, options.roles, &options.bot_login);

    Ok(ActionableThread {
        thread,
        suggestion_id,
        fragment,
        messages,
    })
}

/// Evaluate `target_id` against the pull request's review comments.
pub fn evaluate(comments: &[Comment], target_id: u64, options: &EvaluationOptions) -> Evaluation {
    match evaluate_inner(comments, target_id, options) {
        Ok(actionable) => {
            tracing::info!(
                target_id,
                thread_len = actionable.thread.len(),
                suggestion_id = actionable.suggestion_id,
                "comment is a reply to a bot suggestion"
            );
            Evaluation::Actionable(actionable)
        }
        Err(reason) => {
            tracing::info!(target_id, %reason, "not replying");
            Evaluation::Skipped(reason)
        }
    }
}
