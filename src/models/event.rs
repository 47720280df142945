//! GitHub Actions event payload.
//!
//! The runner writes the triggering webhook payload to the file named by
//! `GITHUB_EVENT_PATH`. Only the pull request number and, for
//! `pull_request_review_comment` events, the comment id are read.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors while reading the event payload.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("failed to read event payload {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse event payload {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("event is not a pull request event")]
    NotPullRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
    pub number: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRef {
    pub id: u64,
}

/// Subset of a GitHub webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
    #[serde(default)]
    pub comment: Option<CommentRef>,
}

impl PullRequestEvent {
    /// Read and parse an event payload file.
    pub fn load(path: &Path) -> Result<Self, EventError> {
        let content = std::fs::read_to_string(path).map_err(|e| EventError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| EventError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// The pull request number, or [`EventError::NotPullRequest`].
    pub fn pull_number(&self) -> Result<u64, EventError> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.number)
            .ok_or(EventError::NotPullRequest)
    }

    /// Id of the comment that triggered the event, when present.
    pub fn comment_id(&self) -> Option<u64> {
        self.comment.as_ref().map(|c| c.id)
    }
}
