pub mod types;

pub use types::{Comment, Issue, IssueRef};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::GitHubConfig;
use types::RawComment;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("Invalid repository URL format: '{0}'. Use format like 'https://github.com/owner/repo'.")]
    InvalidUrl(String),

    #[error("Invalid issue number {0}: must be a positive integer.")]
    InvalidIssueNumber(u64),

    #[error("GitHub issue not found or access denied ({status}).")]
    NotFound { status: StatusCode },

    #[error("Error connecting to GitHub: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("Unexpected response from GitHub: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid GitHub API base URL '{0}'")]
    InvalidApiBase(String),

    #[error("Failed to build GitHub HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Source of issues and their discussion threads.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch the issue and its first page of comments, in API order.
    async fn fetch(&self, issue: &IssueRef) -> Result<(Issue, Vec<Comment>), IssueError>;
}

/// Parse a repository URL and issue number into an [`IssueRef`].
///
/// The owner and repo are the last two non-empty "/"-separated segments,
/// so `https://github.com/owner/repo`, `github.com/owner/repo/` and plain
/// `owner/repo` are all accepted.
pub fn parse_repo_url(url: &str, issue_number: u64) -> Result<IssueRef, IssueError> {
    let segments: Vec<&str> = url
        .trim()
        .trim_end_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let [.., owner, repo] = segments.as_slice() else {
        return Err(IssueError::InvalidUrl(url.to_string()));
    };

    if issue_number == 0 {
        return Err(IssueError::InvalidIssueNumber(issue_number));
    }

    Ok(IssueRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        issue_number,
    })
}

/// Anonymous-by-default client for the GitHub REST API.
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, IssueError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(IssueError::Client)?;

        let api_base = Url::parse(&config.api_base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| IssueError::InvalidApiBase(config.api_base.clone()))?;

        Ok(Self {
            client,
            api_base,
            token: config.token.clone(),
        })
    }

    /// `{api_base}/repos/{owner}/{repo}/issues/{number}`, with each segment
    /// percent-encoded so user input cannot leave the issue resource.
    fn issue_url(&self, issue: &IssueRef) -> Result<Url, IssueError> {
        let number = issue.issue_number.to_string();
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| IssueError::InvalidApiBase(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["repos", &issue.owner, &issue.repo, "issues", &number]);
        Ok(url)
    }

    fn get<U: reqwest::IntoUrl>(&self, url: U) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Comments are best-effort: a non-2xx answer means "no comments".
    async fn fetch_comments(&self, comments_url: &str) -> Result<Vec<Comment>, IssueError> {
        debug!(url = %comments_url, "fetching issue comments");
        let response = self.get(comments_url).send().await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "comments unavailable, continuing without them");
            return Ok(Vec::new());
        }

        let raw = response
            .json::<Vec<RawComment>>()
            .await
            .map_err(IssueError::Decode)?;
        Ok(raw.into_iter().map(Comment::from).collect())
    }
}

#[async_trait]
impl IssueSource for GitHubClient {
    #[instrument(skip(self), fields(owner = %issue.owner, repo = %issue.repo, issue = issue.issue_number))]
    async fn fetch(&self, issue: &IssueRef) -> Result<(Issue, Vec<Comment>), IssueError> {
        let url = self.issue_url(issue)?;

        debug!(url = %url, "fetching issue from GitHub API");
        let response = self.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
                let remaining = response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("unknown");
                warn!(%status, remaining, "GitHub refused the request, probably rate limited");
            }
            return Err(IssueError::NotFound { status });
        }

        let fetched = response.json::<Issue>().await.map_err(IssueError::Decode)?;
        debug!(title = %fetched.title, state = %fetched.state, "received issue");

        let comments = match fetched.comments_url.as_deref() {
            Some(comments_url) if !comments_url.is_empty() => {
                self.fetch_comments(comments_url).await?
            }
            _ => Vec::new(),
        };
        debug!(comments = comments.len(), "received comments");

        Ok((fetched, comments))
    }
}
