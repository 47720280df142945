//! Integration tests using a mock LLM provider and an in-memory GitHub.
//!
//! Validates the reply pipeline end-to-end without making real API calls
//! by using mock implementations of ReplyProvider and ReviewCommentApi.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use cpd_reply::evaluator::{self, EvaluationOptions};
use cpd_reply::github::{GithubError, RepoSlug, ReviewCommentApi};
use cpd_reply::models::{Comment, Evaluation, PromptMessage, SkipReason, User};
use cpd_reply::orchestrator::{ReplyOrchestrator, ReplyOutcome, ReplyRequest};
use cpd_reply::prompt::SYSTEM_PROMPT;
use cpd_reply::providers::{ProviderError, ReplyProvider};

/// A mock provider that records every prompt and returns a canned reply.
struct MockProvider {
    reply: String,
    prompts: Mutex<Vec<Vec<PromptMessage>>>,
}

impl MockProvider {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ReplyProvider for MockProvider {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

/// In-memory pull request review comments.
struct MockGithub {
    comments: Vec<Comment>,
    replies: Mutex<Vec<(u64, String)>>,
}

impl MockGithub {
    fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            replies: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ReviewCommentApi for MockGithub {
    async fn list_review_comments(
        &self,
        _repo: &RepoSlug,
        _pull_number: u64,
    ) -> Result<Vec<Comment>, GithubError> {
        Ok(self.comments.clone())
    }

    async fn create_reply(
        &self,
        _repo: &RepoSlug,
        _pull_number: u64,
        comment_id: u64,
        body: &str,
    ) -> Result<u64, GithubError> {
        let mut replies = self.replies.lock().unwrap();
        replies.push((comment_id, body.to_string()));
        Ok(500 + replies.len() as u64)
    }
}

fn comment(id: u64, parent: Option<u64>, author: &str, body: &str) -> Comment {
    Comment {
        id,
        body: body.to_string(),
        in_reply_to_id: parent,
        diff_hunk: "@@ -1,3\nline1\nline2\nline3".to_string(),
        path: "main.py".to_string(),
        start_line: None,
        line: Some(1),
        user: User {
            login: author.to_string(),
        },
    }
}

/// Bot suggestion on lines 2-3 and a developer question replying to it.
fn suggestion_thread() -> Vec<Comment> {
    let mut suggestion = comment(1, None, "copilot-defender", "```suggestion\nfix```");
    suggestion.start_line = Some(2);
    suggestion.line = Some(3);
    vec![suggestion, comment(2, Some(1), "dev1", "why?")]
}

fn request(comment_id: u64) -> ReplyRequest {
    ReplyRequest {
        repo: "octo/hello".parse().unwrap(),
        pull_number: 1,
        comment_id,
        dry_run: false,
    }
}

fn orchestrator(github: Arc<MockGithub>, provider: Arc<MockProvider>) -> ReplyOrchestrator {
    ReplyOrchestrator::new(github, provider, EvaluationOptions::default(), false)
}

#[tokio::test]
async fn developer_question_gets_reply() {
    let github = Arc::new(MockGithub::new(suggestion_thread()));
    let provider = Arc::new(MockProvider::new("Because it avoids a redundant copy."));

    let outcome = orchestrator(github.clone(), provider.clone())
        .run(&request(2))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReplyOutcome::Posted {
            reply_id: 501,
            body: "Because it avoids a redundant copy.".to_string()
        }
    );

    let prompts = provider.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0],
        vec![
            PromptMessage::system(SYSTEM_PROMPT),
            PromptMessage::user("How can I improve this code?\n\n```\nline2\nline3\n```"),
            PromptMessage::assistant("```suggestion\nfix```"),
            PromptMessage::user("why?"),
        ]
    );

    assert_eq!(
        *github.replies.lock().unwrap(),
        vec![(2, "Because it avoids a redundant copy.".to_string())]
    );
}

#[tokio::test]
async fn bot_authored_target_makes_no_model_call() {
    let github = Arc::new(MockGithub::new(suggestion_thread()));
    let provider = Arc::new(MockProvider::new("unused"));

    let outcome = orchestrator(github.clone(), provider.clone())
        .run(&request(1))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReplyOutcome::Skipped(SkipReason::SelfAuthored { comment_id: 1 })
    );
    assert_eq!(provider.call_count(), 0);
    assert!(github.replies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn answered_comment_is_skipped() {
    let mut comments = suggestion_thread();
    comments.push(comment(3, Some(2), "copilot-defender", "Because..."));
    let github = Arc::new(MockGithub::new(comments));
    let provider = Arc::new(MockProvider::new("unused"));

    let outcome = orchestrator(github.clone(), provider.clone())
        .run(&request(2))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReplyOutcome::Skipped(SkipReason::AlreadyAnswered {
            comment_id: 2,
            reply_id: 3
        })
    );
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn follow_up_question_includes_whole_thread() {
    let mut comments = suggestion_thread();
    comments.push(comment(3, Some(2), "copilot-defender", "It is shorter."));
    comments.push(comment(4, Some(3), "dev1", "Is it faster too?"));
    // Unrelated thread on the same pull request
    comments.push(comment(10, None, "dev2", "Typo here."));
    let github = Arc::new(MockGithub::new(comments));
    let provider = Arc::new(MockProvider::new("Marginally."));

    let outcome = orchestrator(github, provider.clone())
        .run(&request(4))
        .await
        .unwrap();

    assert!(matches!(outcome, ReplyOutcome::Posted { .. }));
    let prompts = provider.prompts.lock().unwrap();
    let turns: Vec<&str> = prompts[0][2..].iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        turns,
        vec!["```suggestion\nfix```", "why?", "It is shorter.", "Is it faster too?"]
    );
}

#[test]
fn fixture_dump_evaluates_offline() {
    let content = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/review_comments.json"
    ))
    .unwrap();
    let comments: Vec<Comment> = serde_json::from_str(&content).unwrap();
    assert_eq!(comments.len(), 4);

    let options = EvaluationOptions::default();

    let Evaluation::Actionable(actionable) = evaluator::evaluate(&comments, 102, &options) else {
        panic!("reply to the bot suggestion should be actionable");
    };
    assert_eq!(actionable.suggestion_id, 101);
    assert_eq!(actionable.thread.ids(), vec![101, 102]);
    assert_eq!(
        actionable.fragment,
        "     let mut total = 0;\n     for i in items {\n         total += i.price;\n     }"
    );

    // Human-only thread
    let eval = evaluator::evaluate(&comments, 202, &options);
    assert_eq!(
        eval.skip_reason(),
        Some(&SkipReason::ParentNotBot {
            parent_id: 201,
            author: "bob".to_string()
        })
    );

    let eval = evaluator::evaluate(&comments, 999, &options);
    assert_eq!(
        eval.skip_reason(),
        Some(&SkipReason::NotFound { comment_id: 999 })
    );
}
