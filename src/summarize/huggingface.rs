use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{interpret_response, SummarizeError, SummaryOutcome, Summarizer};
use crate::config::InferenceConfig;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Client for the Hugging Face Inference API.
///
/// Constructed from [`InferenceConfig`]; a missing token leaves the client
/// unconfigured and every call fails with [`SummarizeError::Unconfigured`]
/// before touching the network.
pub struct HuggingFaceClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, SummarizeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SummarizeError::Client)?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}",
                config.api_base.trim_end_matches('/'),
                config.model
            ),
            token: config.token.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl Summarizer for HuggingFaceClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn summarize(&self, prompt: &str) -> Result<SummaryOutcome, SummarizeError> {
        let token = self.token.as_deref().ok_or(SummarizeError::Unconfigured)?;

        debug!(endpoint = %self.endpoint, "calling inference API");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = error_body(status, response.text().await);
            warn!(%status, body = %body, "inference API returned an error");
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json::<serde_json::Value>().await?;
        let outcome = interpret_response(body);
        match &outcome {
            SummaryOutcome::Summary(summary) => {
                debug!(summary_len = summary.len(), "received summary")
            }
            SummaryOutcome::UnusableOutput { raw_response } => {
                warn!(raw_response = %raw_response, "model output had no usable summary")
            }
        }
        Ok(outcome)
    }
}

/// Body text for an error response. An unreadable body is logged and
/// replaced with a placeholder that names the read failure.
fn error_body<E: std::fmt::Display>(status: StatusCode, body: Result<String, E>) -> String {
    match body {
        Ok(body) => body,
        Err(err) => {
            warn!(%status, error = %err, "failed to read inference error body");
            format!("<unreadable response body: {err}>")
        }
    }
}
