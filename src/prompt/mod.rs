//! Prompt assembly for the reply model call.
//!
//! The model sees a fixed reviewer persona, a user turn asking how to
//! improve the code under discussion, and then the review thread itself
//! replayed as alternating assistant/user turns.

use crate::models::{CommentThread, PromptMessage, Role, RoleStrategy};

/// Persona for the reply model.
pub const SYSTEM_PROMPT: &str = "You are a helpful programming assistant who is conducting a code review. \
You suggest fixes to problems in the code and give helpful explanations. \
You reply to feedback or questions from developers in a polite and constructive way.";

/// User turn that frames the conversation around `fragment`.
pub fn framing_message(fragment: &str) -> PromptMessage {
    PromptMessage::user(format!(
        "How can I improve this code?\n\n```\n{fragment}\n```"
    ))
}

/// Role for the comment at `position` in a thread.
fn role_for(position: usize, author_is_bot: bool, strategy: RoleStrategy) -> Role {
    match strategy {
        RoleStrategy::Positional if position % 2 == 0 => Role::Assistant,
        RoleStrategy::Positional => Role::User,
        RoleStrategy::Authorship if author_is_bot => Role::Assistant,
        RoleStrategy::Authorship => Role::User,
    }
}

/// Map every thread comment, in order, to a role-tagged message whose
/// content is the comment body verbatim.
pub fn thread_messages(
    thread: &CommentThread,
    strategy: RoleStrategy,
    bot_login: &str,
) -> Vec<PromptMessage> {
    thread
        .iter()
        .enumerate()
        .map(|(i, comment)| {
            let role = role_for(i, comment.is_authored_by(bot_login), strategy);
            PromptMessage::new(role, comment.body.clone())
        })
        .collect()
}

/// Ids of comments that break strict bot/human alternation.
///
/// A well-formed thread has the bot at every even position and a human
/// at every odd one. Positional role labels are wrong for any comment
/// returned here.
pub fn alternation_violations(thread: &CommentThread, bot_login: &str) -> Vec<u64> {
    thread
        .iter()
        .enumerate()
        .filter(|(i, c)| (i % 2 == 0) != c.is_authored_by(bot_login))
        .map(|(_, c)| c.id)
        .collect()
}

/// Assemble the full model input: persona, framing, then the thread.
pub fn build_messages(
    thread: &CommentThread,
    fragment: &str,
    strategy: RoleStrategy,
    bot_login: &str,
) -> Vec<PromptMessage> {
    let violations = alternation_violations(thread, bot_login);
    if !violations.is_empty() {
        tracing::warn!(
            comment_ids = ?violations,
            %strategy,
            "thread does not alternate between bot and human turns"
        );
    }

    let mut messages = Vec::with_capacity(thread.len() + 2);
    messages.push(PromptMessage::system(SYSTEM_PROMPT));
    messages.push(framing_message(fragment));
    messages.extend(thread_messages(thread, strategy, bot_login));
    messages
}
