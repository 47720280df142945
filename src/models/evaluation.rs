//! Evaluation results: either an actionable thread or the reason it was skipped.

use serde::Serialize;
use std::fmt;

use super::comment::CommentThread;
use super::prompt::PromptMessage;

/// Why a target comment does not get an automated reply.
///
/// These are expected outcomes, not failures: the bot logs the reason and
/// exits normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The target id is not in the fetched comment collection.
    NotFound { comment_id: u64 },
    /// The target was written by the bot itself.
    SelfAuthored { comment_id: u64 },
    /// Another comment already replies to the target.
    AlreadyAnswered { comment_id: u64, reply_id: u64 },
    /// The target has no resolvable parent.
    NoParent { comment_id: u64 },
    /// The target's parent was not written by the bot.
    ParentNotBot { parent_id: u64, author: String },
    /// No comment in the thread was written by the bot.
    NoBotComment,
    /// The suggestion comment has no end line.
    NoEndLine { comment_id: u64 },
    /// The suggestion comment's line span falls outside its diff hunk.
    LineOutOfRange {
        comment_id: u64,
        start: u32,
        end: u32,
        available: usize,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound { comment_id } => {
                write!(f, "comment {comment_id} not found on the pull request")
            }
            SkipReason::SelfAuthored { comment_id } => {
                write!(f, "comment {comment_id} was written by the bot")
            }
            SkipReason::AlreadyAnswered {
                comment_id,
                reply_id,
            } => write!(f, "comment {comment_id} already has a reply ({reply_id})"),
            SkipReason::NoParent { comment_id } => {
                write!(f, "comment {comment_id} is not a reply to another comment")
            }
            SkipReason::ParentNotBot { parent_id, author } => write!(
                f,
                "parent comment {parent_id} was written by {author}, not the bot"
            ),
            SkipReason::NoBotComment => write!(f, "no bot comment found in the thread"),
            SkipReason::NoEndLine { comment_id } => {
                write!(f, "suggestion comment {comment_id} has no end line")
            }
            SkipReason::LineOutOfRange {
                comment_id,
                start,
                end,
                available,
            } => write!(
                f,
                "suggestion comment {comment_id} spans lines {start}-{end} \
                 but its diff hunk has {available} content line(s)"
            ),
        }
    }
}

/// A thread that passed every gate, with its assembled model input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionableThread {
    /// Root-first ancestry chain ending at the target.
    pub thread: CommentThread,
    /// Id of the bot comment whose diff hunk supplied the code fragment.
    pub suggestion_id: u64,
    /// Code under discussion, taken from the suggestion's diff hunk.
    pub fragment: String,
    /// Ordered model input: system, framing, then the thread turns.
    pub messages: Vec<PromptMessage>,
}

/// Outcome of evaluating one target comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Evaluation {
    Actionable(ActionableThread),
    Skipped(SkipReason),
}

impl Evaluation {
    pub fn is_actionable(&self) -> bool {
        matches!(self, Evaluation::Actionable(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Evaluation::Skipped(reason) => Some(reason),
            Evaluation::Actionable(_) => None,
        }
    }
}
