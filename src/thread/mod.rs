//! Reply-thread reconstruction.
//!
//! Rebuilds the root-first ancestry chain ending at a target review
//! comment from the flat, unordered list GitHub returns, rejecting
//! targets the bot must not answer.

use std::collections::{HashMap, HashSet};

use crate::models::{Comment, CommentThread, SkipReason};

/// Index comments by id. Later entries win when ids repeat.
fn index_comments(comments: &[Comment]) -> HashMap<u64, &Comment> {
    let mut index = HashMap::with_capacity(comments.len());
    for comment in comments {
        if index.insert(comment.id, comment).is_some() {
            tracing::warn!(
                comment_id = comment.id,
                "duplicate review comment id, keeping the later entry"
            );
        }
    }
    index
}

/// Reconstruct the thread ending at `target_id`.
///
/// Returns the chain root-first with the target last. The walk follows
/// `in_reply_to_id` until it reaches a comment without a parent or a
/// parent id that is not in `comments`; in the latter case the chain is
/// silently shorter than the true ancestry.
///
/// Rejected targets:
/// - `target_id` not present → [`SkipReason::NotFound`]
/// - target written by `bot_login` → [`SkipReason::SelfAuthored`]
/// - some comment already replies to the target → [`SkipReason::AlreadyAnswered`]
pub fn reconstruct_thread(
    comments: &[Comment],
    target_id: u64,
    bot_login: &str,
) -> Result<CommentThread, SkipReason> {
    let index = index_comments(comments);

    let target = *index.get(&target_id).ok_or(SkipReason::NotFound {
        comment_id: target_id,
    })?;

    if target.is_authored_by(bot_login) {
        return Err(SkipReason::SelfAuthored {
            comment_id: target_id,
        });
    }

    if let Some(reply) = comments
        .iter()
        .find(|c| c.in_reply_to_id == Some(target_id))
    {
        return Err(SkipReason::AlreadyAnswered {
            comment_id: target_id,
            reply_id: reply.id,
        });
    }

    let mut chain = vec![target];
    let mut visited = HashSet::from([target.id]);
    let mut current = target;

    while let Some(parent_id) = current.in_reply_to_id {
        let Some(&parent) = index.get(&parent_id) else {
            tracing::debug!(
                comment_id = current.id,
                parent_id,
                "parent comment missing, thread truncated"
            );
            break;
        };
        if !visited.insert(parent.id) {
            tracing::warn!(comment_id = parent.id, "reply cycle detected, thread truncated");
            break;
        }
        chain.push(parent);
        current = parent;
    }

    chain.reverse();
    tracing::debug!(
        target_id,
        thread = ?chain.iter().map(|c| c.id).collect::<Vec<_>>(),
        "reconstructed thread"
    );

    Ok(CommentThread::new(chain.into_iter().cloned().collect()))
}

/// Check that the target replies directly to a bot comment.
///
/// Requires at least two comments in the thread and the second-to-last
/// one written by `bot_login`.
pub fn check_replies_to_bot(thread: &CommentThread, bot_login: &str) -> Result<(), SkipReason> {
    let target_id = thread.target().map(|c| c.id).unwrap_or_default();
    let parent = thread.parent().ok_or(SkipReason::NoParent {
        comment_id: target_id,
    })?;

    if parent.is_authored_by(bot_login) {
        Ok(())
    } else {
        Err(SkipReason::ParentNotBot {
            parent_id: parent.id,
            author: parent.user.login.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    const BOT: &str = "copilot-defender";

    fn comment(id: u64, parent: Option<u64>, author: &str) -> Comment {
        Comment {
            id,
            body: format!("body {id}"),
            in_reply_to_id: parent,
            diff_hunk: String::new(),
            path: "src/lib.rs".to_string(),
            start_line: None,
            line: None,
            user: User {
                login: author.to_string(),
            },
        }
    }

    #[test]
    fn full_chain_is_root_first() {
        let comments = vec![
            comment(3, Some(2), "dev1"),
            comment(1, None, BOT),
            comment(2, Some(1), "dev1"),
        ];
        let thread = reconstruct_thread(&comments, 3, BOT).unwrap();
        assert_eq!(thread.ids(), vec![1, 2, 3]);
    }

    #[test]
    fn unrelated_threads_are_ignored() {
        let comments = vec![
            comment(1, None, BOT),
            comment(2, Some(1), "dev1"),
            comment(10, None, BOT),
            comment(11, Some(10), "dev2"),
        ];
        let thread = reconstruct_thread(&comments, 11, BOT).unwrap();
        assert_eq!(thread.ids(), vec![10, 11]);
    }

    #[test]
    fn missing_target_is_not_found() {
        let comments = vec![comment(1, None, BOT)];
        let err = reconstruct_thread(&comments, 99, BOT).unwrap_err();
        assert_eq!(err, SkipReason::NotFound { comment_id: 99 });
    }

    #[test]
    fn empty_collection_is_not_found() {
        let err = reconstruct_thread(&[], 1, BOT).unwrap_err();
        assert_eq!(err, SkipReason::NotFound { comment_id: 1 });
    }

    #[test]
    fn bot_authored_target_is_rejected() {
        let comments = vec![
            comment(1, None, BOT),
            comment(2, Some(1), "dev1"),
            comment(3, Some(2), BOT),
        ];
        let err = reconstruct_thread(&comments, 3, BOT).unwrap_err();
        assert_eq!(err, SkipReason::SelfAuthored { comment_id: 3 });
    }

    #[test]
    fn answered_target_is_rejected() {
        let comments = vec![
            comment(1, None, BOT),
            comment(2, Some(1), "dev1"),
            comment(3, Some(2), "dev2"),
        ];
        let err = reconstruct_thread(&comments, 2, BOT).unwrap_err();
        assert_eq!(
            err,
            SkipReason::AlreadyAnswered {
                comment_id: 2,
                reply_id: 3
            }
        );
    }

    #[test]
    fn self_authorship_is_checked_before_replies() {
        let comments = vec![comment(1, None, BOT), comment(2, Some(1), "dev1")];
        let err = reconstruct_thread(&comments, 1, BOT).unwrap_err();
        assert_eq!(err, SkipReason::SelfAuthored { comment_id: 1 });
    }

    #[test]
    fn missing_intermediate_parent_truncates() {
        // 2 is absent: 3 → 2 cannot be followed, so the chain starts at 3.
        let comments = vec![
            comment(1, None, BOT),
            comment(3, Some(2), BOT),
            comment(4, Some(3), "dev1"),
        ];
        let thread = reconstruct_thread(&comments, 4, BOT).unwrap();
        assert_eq!(thread.ids(), vec![3, 4]);
    }

    #[test]
    fn root_target_yields_single_comment() {
        let comments = vec![comment(1, None, "dev1")];
        let thread = reconstruct_thread(&comments, 1, BOT).unwrap();
        assert_eq!(thread.ids(), vec![1]);
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let comments = vec![
            comment(1, None, "dev9"),
            comment(1, None, BOT),
            comment(2, Some(1), "dev1"),
        ];
        let thread = reconstruct_thread(&comments, 2, BOT).unwrap();
        assert_eq!(thread.as_slice()[0].user.login, BOT);
    }

    #[test]
    fn cycle_above_target_terminates() {
        // 5 → 6 → 7 → 6 ...; nobody replies to 5.
        let comments = vec![
            comment(6, Some(7), BOT),
            comment(7, Some(6), "dev1"),
            comment(5, Some(6), "dev1"),
        ];
        let thread = reconstruct_thread(&comments, 5, BOT).unwrap();
        assert_eq!(thread.ids(), vec![7, 6, 5]);
    }

    #[test]
    fn self_reply_is_already_answered() {
        let comments = vec![comment(1, Some(1), "dev1")];
        let err = reconstruct_thread(&comments, 1, BOT).unwrap_err();
        assert!(matches!(err, SkipReason::AlreadyAnswered { .. }));
    }

    #[test]
    fn replies_to_bot_accepts_bot_parent() {
        let thread = CommentThread::new(vec![comment(1, None, BOT), comment(2, Some(1), "dev1")]);
        assert!(check_replies_to_bot(&thread, BOT).is_ok());
    }

    #[test]
    fn replies_to_bot_rejects_short_thread() {
        let thread = CommentThread::new(vec![comment(2, None, "dev1")]);
        assert_eq!(
            check_replies_to_bot(&thread, BOT).unwrap_err(),
            SkipReason::NoParent { comment_id: 2 }
        );
    }

    #[test]
    fn replies_to_bot_rejects_human_parent() {
        let thread = CommentThread::new(vec![
            comment(1, None, BOT),
            comment(2, Some(1), "dev1"),
            comment(3, Some(2), "dev2"),
        ]);
        assert_eq!(
            check_replies_to_bot(&thread, BOT).unwrap_err(),
            SkipReason::ParentNotBot {
                parent_id: 2,
                author: "dev1".to_string()
            }
        );
    }

    #[test]
    fn bot_login_is_configurable() {
        let comments = vec![comment(1, None, "other-bot"), comment(2, Some(1), "dev1")];
        let thread = reconstruct_thread(&comments, 2, "other-bot").unwrap();
        assert!(check_replies_to_bot(&thread, "other-bot").is_ok());
        assert!(check_replies_to_bot(&thread, BOT).is_err());
    }
}
