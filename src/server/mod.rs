use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::analysis::{self, Analysis, AnalysisError, AnalyzeRequest};
use crate::issue::{IssueError, IssueSource};
use crate::summarize::Summarizer;

/// Collaborators shared by every request. Both are read-only.
#[derive(Clone)]
pub struct AppState {
    pub issues: Arc<dyn IssueSource>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AnalysisError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::InvalidRequest(_)
            | AnalysisError::Issue(IssueError::InvalidUrl(_) | IssueError::InvalidIssueNumber(_)) => {
                StatusCode::BAD_REQUEST
            }
            AnalysisError::Issue(IssueError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AnalysisError::Issue(
                IssueError::Unavailable(_)
                | IssueError::Decode(_)
                | IssueError::InvalidApiBase(_)
                | IssueError::Client(_),
            )
            | AnalysisError::Summarize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "analysis failed");
        } else {
            warn!(%status, error = %self, "analysis rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /analyze`. A model answer without a usable summary is still a 200.
/// Bodies the JSON extractor rejects are reported as 400 with a `detail`.
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Analysis>, AnalysisError> {
    let Json(request) =
        payload.map_err(|rejection| AnalysisError::InvalidRequest(rejection.body_text()))?;
    let analysis = analysis::run(&request, state.issues.as_ref(), state.summarizer.as_ref()).await?;
    Ok(Json(analysis))
}

pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await
}
