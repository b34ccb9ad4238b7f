use serde::{Deserialize, Serialize};

/// Message carried by every model-output failure.
pub const UNUSABLE_OUTPUT_MESSAGE: &str = "Failed to get a valid summary from AI model.";

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// Repository URL, e.g. https://github.com/facebook/react
    pub repo_url: String,
    pub issue_number: u64,
}

/// Summary merged with the issue fields it describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub summary: String,
    pub title: String,
    pub url: String,
    pub state: String,
}

/// Returned with a 200 status when the model answered without a usable
/// summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOutputError {
    pub error: String,
    pub raw_response: serde_json::Value,
}

impl ModelOutputError {
    pub fn new(raw_response: serde_json::Value) -> Self {
        Self {
            error: UNUSABLE_OUTPUT_MESSAGE.to_string(),
            raw_response,
        }
    }
}

/// Result of a completed analysis. Serializes as the bare inner body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Summarized(AnalysisResponse),
    Unusable(ModelOutputError),
}
