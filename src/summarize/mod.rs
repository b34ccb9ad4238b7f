pub mod huggingface;

pub use huggingface::HuggingFaceClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Hugging Face API key is not configured; set HUGGINGFACE_API_KEY or inference.token")]
    Unconfigured,

    #[error("Hugging Face API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to build inference HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// What a summarization call produced when the transport itself succeeded.
///
/// `UnusableOutput` is data, not an error: the model answered but its output
/// had no recognisable summary.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Summary(String),
    UnusableOutput { raw_response: serde_json::Value },
}

/// Remote model that condenses a prompt into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<SummaryOutcome, SummarizeError>;
}

/// Interpret a 200 response body from a summarization model.
///
/// Expected shape is `[{"summary_text": "..."}, ...]`. A first element
/// without a string `summary_text` yields an empty summary; anything that is
/// not a non-empty array of objects is unusable.
pub fn interpret_response(body: serde_json::Value) -> SummaryOutcome {
    let first = body.as_array().and_then(|items| items.first());
    match first.and_then(|item| item.as_object()) {
        Some(object) => SummaryOutcome::Summary(
            object
                .get("summary_text")
                .and_then(|text| text.as_str())
                .unwrap_or_default()
                .to_string(),
        ),
        None => SummaryOutcome::UnusableOutput { raw_response: body },
    }
}
