//! Review comment and thread types.

use serde::{Deserialize, Serialize};

/// Author of a review comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// A single pull request review comment, as returned by the GitHub REST API.
///
/// Only the fields the bot reads are modelled; everything else in the
/// payload is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    /// Parent comment id; `None` for the comment that starts a thread.
    #[serde(default)]
    pub in_reply_to_id: Option<u64>,
    /// Diff context the comment is anchored to: a `@@` header line
    /// followed by content lines.
    #[serde(default)]
    pub diff_hunk: String,
    #[serde(default)]
    pub path: String,
    /// First line of a multi-line span, 1-based within the hunk's content lines.
    #[serde(default)]
    pub start_line: Option<u32>,
    /// Last line of the span, 1-based within the hunk's content lines.
    #[serde(default)]
    pub line: Option<u32>,
    pub user: User,
}

impl Comment {
    /// Returns `true` if the comment was written by `login`.
    pub fn is_authored_by(&self, login: &str) -> bool {
        self.user.login == login
    }
}

/// Root-first ancestry chain of review comments ending at a target comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentThread {
    comments: Vec<Comment>,
}

impl CommentThread {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// The comment the thread was reconstructed for (last element).
    pub fn target(&self) -> Option<&Comment> {
        self.comments.last()
    }

    /// The comment the target replies to (second-to-last element).
    pub fn parent(&self) -> Option<&Comment> {
        self.comments.len().checked_sub(2).map(|i| &self.comments[i])
    }

    /// First comment in thread order written by `login`.
    pub fn first_by_author(&self, login: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.is_authored_by(login))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }

    pub fn as_slice(&self) -> &[Comment] {
        &self.comments
    }

    /// Comment ids in thread order.
    pub fn ids(&self) -> Vec<u64> {
        self.comments.iter().map(|c| c.id).collect()
    }
}

impl<'a> IntoIterator for &'a CommentThread {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}
