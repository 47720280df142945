//! Code context extraction from a review comment's diff hunk.
//!
//! GitHub anchors every review comment to a `diff_hunk`: one `@@` header
//! line followed by the content lines the comment can address. The
//! comment's `start_line`/`line` pick a 1-based span of those content
//! lines, which becomes the code shown to the model.

use thiserror::Error;

use crate::models::{Comment, SkipReason};

/// Errors while resolving a comment's line span.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeContextError {
    #[error("comment has no end line")]
    MissingEndLine,

    #[error("lines {start}-{end} are outside the {available} content line(s) of the diff hunk")]
    LineOutOfRange {
        start: u32,
        end: u32,
        available: usize,
    },
}

impl CodeContextError {
    /// Convert into the skip reason reported for `comment_id`.
    pub fn into_skip_reason(self, comment_id: u64) -> SkipReason {
        match self {
            CodeContextError::MissingEndLine => SkipReason::NoEndLine { comment_id },
            CodeContextError::LineOutOfRange {
                start,
                end,
                available,
            } => SkipReason::LineOutOfRange {
                comment_id,
                start,
                end,
                available,
            },
        }
    }
}

/// Content lines of a diff hunk, without the `@@` header.
pub fn hunk_content_lines(diff_hunk: &str) -> Vec<&str> {
    diff_hunk.lines().skip(1).collect()
}

/// Select lines `start..=end` (1-based, inclusive) from a diff hunk's
/// content lines. A missing `start` selects the single line `end`.
pub fn extract_lines(
    diff_hunk: &str,
    start: Option<u32>,
    end: Option<u32>,
) -> Result<String, CodeContextError> {
    let end = end.ok_or(CodeContextError::MissingEndLine)?;
    let start = start.unwrap_or(end);
    let lines = hunk_content_lines(diff_hunk);

    let out_of_range = CodeContextError::LineOutOfRange {
        start,
        end,
        available: lines.len(),
    };
    if start == 0 || start > end || end as usize > lines.len() {
        return Err(out_of_range);
    }

    Ok(lines[start as usize - 1..end as usize].join("\n"))
}

/// Extract the code fragment a suggestion comment refers to.
pub fn extract_code_fragment(comment: &Comment) -> Result<String, CodeContextError> {
    extract_lines(&comment.diff_hunk, comment.start_line, comment.line)
}
