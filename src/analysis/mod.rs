pub mod prompt;
pub mod types;

pub use types::{Analysis, AnalysisResponse, AnalyzeRequest, ModelOutputError};

use thiserror::Error;
use tracing::{debug, info, info_span, Instrument};

use crate::issue::{self, IssueError, IssueSource};
use crate::summarize::{SummarizeError, Summarizer, SummaryOutcome};

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request body could not be read as an [`AnalyzeRequest`].
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Issue(#[from] IssueError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

/// Run one analysis end to end: parse the repository URL, fetch the issue
/// and its comments, build the prompt, summarize, and merge.
///
/// Every step runs sequentially and any failure is returned as-is. An
/// unusable model answer is not a failure; it comes back as
/// [`Analysis::Unusable`].
pub async fn run(
    request: &AnalyzeRequest,
    issues: &dyn IssueSource,
    summarizer: &dyn Summarizer,
) -> Result<Analysis, AnalysisError> {
    let issue_ref = issue::parse_repo_url(&request.repo_url, request.issue_number)?;
    info!(issue = %issue_ref, "analyzing issue");

    let (fetched, comments) = issues
        .fetch(&issue_ref)
        .instrument(info_span!("fetch", issue = %issue_ref))
        .await?;

    let prompt = prompt::build_prompt(&fetched, &comments);
    debug!(prompt_len = prompt.len(), comments = comments.len(), "built prompt");

    let outcome = summarizer
        .summarize(&prompt)
        .instrument(info_span!("summarize", issue = %issue_ref))
        .await?;

    let analysis = match outcome {
        SummaryOutcome::Summary(summary) => Analysis::Summarized(AnalysisResponse {
            summary,
            title: fetched.title,
            url: fetched.html_url,
            state: fetched.state,
        }),
        SummaryOutcome::UnusableOutput { raw_response } => {
            Analysis::Unusable(ModelOutputError::new(raw_response))
        }
    };
    info!(issue = %issue_ref, summarized = matches!(analysis, Analysis::Summarized(_)), "analysis complete");
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Comment, Issue, IssueRef};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory issue source. `None` makes every fetch fail with NotFound.
    pub struct StaticIssues {
        pub issue: Option<(Issue, Vec<Comment>)>,
        pub requested: Mutex<Vec<IssueRef>>,
    }

    impl StaticIssues {
        pub fn new(issue: Issue, comments: Vec<Comment>) -> Self {
            Self {
                issue: Some((issue, comments)),
                requested: Mutex::new(Vec::new()),
            }
        }

        pub fn missing() -> Self {
            Self {
                issue: None,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IssueSource for StaticIssues {
        async fn fetch(&self, issue: &IssueRef) -> Result<(Issue, Vec<Comment>), IssueError> {
            self.requested.lock().unwrap().push(issue.clone());
            self.issue.clone().ok_or(IssueError::NotFound {
                status: StatusCode::NOT_FOUND,
            })
        }
    }

    /// Summarizer that replays a canned outcome and records the prompt.
    pub struct CannedSummarizer {
        pub outcome: fn() -> Result<SummaryOutcome, SummarizeError>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl CannedSummarizer {
        pub fn new(outcome: fn() -> Result<SummaryOutcome, SummarizeError>) -> Self {
            Self {
                outcome,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Summarizer for CannedSummarizer {
        async fn summarize(&self, prompt: &str) -> Result<SummaryOutcome, SummarizeError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.outcome)()
        }
    }

    pub fn sample_issue() -> Issue {
        Issue {
            title: "Login button does nothing".to_string(),
            body: Some("Clicking login has no effect.".to_string()),
            html_url: "https://github.com/org/repo/issues/7".to_string(),
            state: "open".to_string(),
            comments_url: None,
        }
    }

    fn request(repo_url: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            repo_url: repo_url.to_string(),
            issue_number: 7,
        }
    }

    #[tokio::test]
    async fn test_run_merges_summary_with_issue() {
        let issues = StaticIssues::new(sample_issue(), vec![]);
        let summarizer = CannedSummarizer::new(|| Ok(SummaryOutcome::Summary("X".to_string())));

        let analysis = run(&request("https://github.com/org/repo"), &issues, &summarizer)
            .await
            .unwrap();

        assert_eq!(
            analysis,
            Analysis::Summarized(AnalysisResponse {
                summary: "X".to_string(),
                title: "Login button does nothing".to_string(),
                url: "https://github.com/org/repo/issues/7".to_string(),
                state: "open".to_string(),
            })
        );
        let requested = issues.requested.lock().unwrap();
        assert_eq!(requested[0].owner, "org");
        assert_eq!(requested[0].repo, "repo");
        assert_eq!(requested[0].issue_number, 7);
    }

    #[tokio::test]
    async fn test_run_passes_built_prompt() {
        let comments = vec![Comment {
            author_login: "bob".to_string(),
            body: Some("Works for me".to_string()),
        }];
        let issues = StaticIssues::new(sample_issue(), comments);
        let summarizer = CannedSummarizer::new(|| Ok(SummaryOutcome::Summary("X".to_string())));

        run(&request("org/repo"), &issues, &summarizer).await.unwrap();

        let prompts = summarizer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("ISSUE TITLE: Login button does nothing"));
        assert!(prompts[0].contains("COMMENTS: Comment by bob: Works for me"));
    }

    #[tokio::test]
    async fn test_run_unusable_output_is_data() {
        let issues = StaticIssues::new(sample_issue(), vec![]);
        let summarizer = CannedSummarizer::new(|| {
            Ok(SummaryOutcome::UnusableOutput {
                raw_response: json!([]),
            })
        });

        let analysis = run(&request("org/repo"), &issues, &summarizer).await.unwrap();
        assert_eq!(analysis, Analysis::Unusable(ModelOutputError::new(json!([]))));
    }

    #[tokio::test]
    async fn test_run_invalid_url_skips_fetch() {
        let issues = StaticIssues::new(sample_issue(), vec![]);
        let summarizer = CannedSummarizer::new(|| Ok(SummaryOutcome::Summary("X".to_string())));

        let err = run(&request("repo"), &issues, &summarizer).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Issue(IssueError::InvalidUrl(_))));
        assert!(issues.requested.lock().unwrap().is_empty());
        assert!(summarizer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_missing_issue_skips_summarize() {
        let issues = StaticIssues::missing();
        let summarizer = CannedSummarizer::new(|| Ok(SummaryOutcome::Summary("X".to_string())));

        let err = run(&request("org/repo"), &issues, &summarizer).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Issue(IssueError::NotFound { .. })));
        assert!(summarizer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_propagates_inference_error() {
        let issues = StaticIssues::new(sample_issue(), vec![]);
        let summarizer = CannedSummarizer::new(|| {
            Err(SummarizeError::Api {
                status: 503,
                body: "busy".to_string(),
            })
        });

        let err = run(&request("org/repo"), &issues, &summarizer).await.unwrap_err();
        assert!(err.to_string().contains("Hugging Face API error"));
    }
}
