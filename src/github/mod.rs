//! GitHub REST API access for pull-request review comments.
//!
//! Only two endpoints are used: listing a pull request's review comments
//! and creating a reply to one of them. Both sit behind
//! [`ReviewCommentApi`] so the orchestrator can be tested without a network.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::constants;
use crate::models::Comment;

/// Page size requested from the listing endpoint (GitHub's maximum).
const PER_PAGE: usize = 100;

/// Errors from GitHub API calls.
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("invalid repository '{0}', expected owner/repo")]
    InvalidRepository(String),

    #[error("no GitHub token configured. Set {} or {}", constants::ENV_GITHUB_TOKEN, constants::ENV_GITHUB_TOKEN_FALLBACK)]
    MissingToken,

    #[error("GitHub API request failed: {0}")]
    Request(String),

    #[error("GitHub API returned HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("failed to decode GitHub response: {0}")]
    Decode(String),
}

/// An `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoSlug {
    type Err = GithubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(GithubError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Review-comment operations needed by the orchestrator.
#[async_trait]
pub trait ReviewCommentApi: Send + Sync {
    /// All review comments on a pull request, across every page.
    async fn list_review_comments(
        &self,
        repo: &RepoSlug,
        pull_number: u64,
    ) -> Result<Vec<Comment>, GithubError>;

    /// Reply to a review comment; returns the id of the created comment.
    async fn create_reply(
        &self,
        repo: &RepoSlug,
        pull_number: u64,
        comment_id: u64,
        body: &str,
    ) -> Result<u64, GithubError>;
}

#[derive(Debug, Deserialize)]
struct CreatedComment {
    id: u64,
}

/// `reqwest`-based GitHub REST client.
pub struct GitHubClient {
    api_url: String,
    token: String,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self, GithubError> {
        let token = token.ok_or(GithubError::MissingToken)?;
        let client = reqwest::Client::builder()
            .user_agent(constants::USER_AGENT)
            .build()
            .map_err(|e| GithubError::Request(e.to_string()))?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn comments_url(&self, repo: &RepoSlug, pull_number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{pull_number}/comments",
            self.api_url, repo.owner, repo.repo
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, GithubError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(GithubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| GithubError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ReviewCommentApi for GitHubClient {
    async fn list_review_comments(
        &self,
        repo: &RepoSlug,
        pull_number: u64,
    ) -> Result<Vec<Comment>, GithubError> {
        let url = self.comments_url(repo, pull_number);
        let mut all = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .request(reqwest::Method::GET, &url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await
                .map_err(|e| GithubError::Request(e.to_string()))?;
            let batch: Vec<Comment> = Self::read_json(response, &url).await?;
            let count = batch.len();
            tracing::debug!(page, count, "fetched review comments page");
            all.extend(batch);

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        tracing::info!(
            repository = %repo,
            pull_number,
            total = all.len(),
            "fetched review comments"
        );
        Ok(all)
    }

    async fn create_reply(
        &self,
        repo: &RepoSlug,
        pull_number: u64,
        comment_id: u64,
        body: &str,
    ) -> Result<u64, GithubError> {
        let url = format!(
            "{}/{comment_id}/replies",
            self.comments_url(repo, pull_number)
        );
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| GithubError::Request(e.to_string()))?;
        let created: CreatedComment = Self::read_json(response, &url).await?;
        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slug() -> RepoSlug {
        "octo/hello".parse().unwrap()
    }

    fn comment_json(id: u64, login: &str) -> serde_json::Value {
        json!({
            "id": id,
            "body": format!("comment {id}"),
            "diff_hunk": "@@ -1,2 +1,2 @@\n a\n b",
            "path": "src/lib.rs",
            "line": 1,
            "start_line": null,
            "in_reply_to_id": null,
            "user": {"login": login, "id": 1, "type": "User"},
            "html_url": "https://github.com/octo/hello/pull/7#discussion_r1"
        })
    }

    #[test]
    fn repo_slug_parses_owner_and_repo() {
        let slug: RepoSlug = "octo/hello".parse().unwrap();
        assert_eq!(slug.owner, "octo");
        assert_eq!(slug.repo, "hello");
        assert_eq!(slug.to_string(), "octo/hello");
    }

    #[test]
    fn repo_slug_rejects_malformed() {
        for bad in ["", "octo", "/hello", "octo/", "a/b/c"] {
            assert!(bad.parse::<RepoSlug>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn client_requires_token() {
        let err = GitHubClient::new("https://api.github.com", None).err().unwrap();
        assert!(matches!(err, GithubError::MissingToken));
        assert!(err.to_string().contains("CPD_GITHUB_TOKEN"));
    }

    #[tokio::test]
    async fn list_review_comments_single_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/7/comments"))
            .and(query_param("per_page", "100"))
            .and(query_param("page", "1"))
            .and(header("authorization", "Bearer ghp_test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([comment_json(1, "copilot-defender"), comment_json(2, "alice")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), Some("ghp_test")).unwrap();
        let comments = client.list_review_comments(&slug(), 7).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].user.login, "copilot-defender");
        assert_eq!(comments[1].id, 2);
    }

    #[tokio::test]
    async fn list_review_comments_follows_pages() {
        let server = MockServer::start().await;
        let first: Vec<_> = (1..=100).map(|id| comment_json(id, "alice")).collect();
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/7/comments"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(first)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls/7/comments"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([comment_json(101, "bob")])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), Some("ghp_test")).unwrap();
        let comments = client.list_review_comments(&slug(), 7).await.unwrap();
        assert_eq!(comments.len(), 101);
        assert_eq!(comments[100].user.login, "bob");
    }

    #[tokio::test]
    async fn list_review_comments_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), Some("ghp_test")).unwrap();
        let err = client.list_review_comments(&slug(), 7).await.unwrap_err();
        match err {
            GithubError::Status { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_reply_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/hello/pulls/7/comments/42/replies"))
            .and(body_json(json!({"body": "Thanks, here is a fix."})))
            .respond_with(ResponseTemplate::new(201).set_body_json(comment_json(99, "github-actions[bot]")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), Some("ghp_test")).unwrap();
        let id = client
            .create_reply(&slug(), 7, 42, "Thanks, here is a fix.")
            .await
            .unwrap();
        assert_eq!(id, 99);
    }
}
