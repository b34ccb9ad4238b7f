use crate::analysis::Analysis;

/// How an issue's state is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
    Other,
}

impl IssueState {
    pub fn from_api(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "open" => IssueState::Open,
            "closed" => IssueState::Closed,
            _ => IssueState::Other,
        }
    }
}

/// One analysis, tagged with what was asked for.
#[derive(Debug)]
pub struct Report {
    /// Repository URL as given on the command line
    pub repo_url: String,
    /// Requested issue number
    pub issue_number: u64,
    /// Outcome of the analysis
    pub analysis: Analysis,
}
