use serde::Deserialize;

/// The components of a repository URL plus the requested issue number.
/// Extracted by parse_repo_url() in issue/mod.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
}

impl std::fmt::Display for IssueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.issue_number)
    }
}

/// Snapshot of a GitHub issue, deserialized straight from the REST response.
/// Only the fields the summarizer needs are kept; title, html_url and state
/// are required so that a non-issue body fails to decode.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub title: String,
    /// Null when the issue was opened without a description
    pub body: Option<String>,
    pub html_url: String,
    pub state: String,
    /// Location of the comment list; absent on some API shapes
    pub comments_url: Option<String>,
}

/// A single issue comment.
/// Note: Not Deserialize — built from [`RawComment`] so that a deleted
/// author (null `user`) still yields a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author_login: String,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
    user: Option<RawUser>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            author_login: raw
                .user
                .map(|user| user.login)
                .unwrap_or_else(|| "ghost".to_string()),
            body: raw.body,
        }
    }
}
