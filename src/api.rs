//! HTTP surface for gistr.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /summarize` – Summarize an article. Accepts `text` plus optional `length`
//!   (`short` | `medium` | `long`), `extract_key_points`, `language_hint` and `timeout_ms`, and
//!   returns `{ "summary", "key_points", "source" }`.
//! - `GET /metrics` – Observe how many summaries each strategy produced.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.

use crate::metrics::{MetricsSnapshot, SummaryMetrics};
use crate::summarization::{
    LanguageHint, SummarizationOrchestrator, SummarizeError, SummaryLength, SummaryOptions,
    SummaryRequest, SummaryResult,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Shared state behind every route.
pub struct AppState {
    orchestrator: SummarizationOrchestrator,
    metrics: SummaryMetrics,
}

impl AppState {
    /// Wrap an orchestrator with a fresh metrics registry.
    pub fn new(orchestrator: SummarizationOrchestrator) -> Self {
        Self {
            orchestrator,
            metrics: SummaryMetrics::new(),
        }
    }
}

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summarize", post(summarize))
        .route("/metrics", get(get_metrics))
        .route("/commands", get(get_commands))
        .with_state(state)
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
struct SummarizeBody {
    /// Article text to summarize.
    text: String,
    /// Optional target length (defaults to `medium`).
    #[serde(default)]
    length: Option<SummaryLength>,
    /// Optional toggle for key points (defaults to `true`).
    #[serde(default)]
    extract_key_points: Option<bool>,
    /// Optional output language code such as `fr` (defaults to detection).
    #[serde(default)]
    language_hint: Option<String>,
    /// Optional budget for the remote cascade in milliseconds.
    #[serde(default)]
    timeout_ms: Option<u64>,
}

impl SummarizeBody {
    fn into_request(self) -> SummaryRequest {
        let defaults = SummaryOptions::default();
        let options = SummaryOptions {
            length: self.length.unwrap_or(defaults.length),
            extract_key_points: self
                .extract_key_points
                .unwrap_or(defaults.extract_key_points),
            language_hint: self
                .language_hint
                .as_deref()
                .map(LanguageHint::from_code)
                .unwrap_or(defaults.language_hint),
        };
        let request = SummaryRequest::new(self.text).with_options(options);
        match self.timeout_ms {
            Some(timeout_ms) => {
                request.with_deadline(Instant::now() + Duration::from_millis(timeout_ms))
            }
            None => request,
        }
    }
}

/// Summarize an article, preferring a remote model and falling back to extraction.
async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SummarizeBody>,
) -> Result<Json<SummaryResult>, AppError> {
    if body.text.trim().is_empty() {
        return Err(AppError::EmptyText);
    }

    let request = body.into_request();
    match state.orchestrator.summarize(&request).await {
        Ok(result) => {
            state.metrics.record_summary(&result);
            tracing::info!(
                source = ?result.source,
                key_points = result.key_points.len(),
                "Summarize request completed"
            );
            Ok(Json(result))
        }
        Err(error) => {
            state.metrics.record_deadline_exceeded();
            tracing::warn!(error = %error, "Summarize request abandoned");
            Err(AppError::Summarize(error))
        }
    }
}

/// Return the summarization counters.
async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: concat!(
                    "Summarize an article into a short text and key points. Response returns ",
                    "{ \"summary\": string, \"key_points\": [string], ",
                    "\"source\": { \"kind\": \"remote\" | \"extractive\" } }."
                ),
                request_example: Some(json!({
                    "text": "Article contents",
                    "length": "short",
                    "extract_key_points": true,
                    "language_hint": "fr",
                    "timeout_ms": 15000
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return counters of remote, extractive and timed-out summaries.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    EmptyText,
    Summarize(SummarizeError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::EmptyText => {
                (StatusCode::BAD_REQUEST, "text must not be empty").into_response()
            }
            Self::Summarize(error @ SummarizeError::DeadlineExceeded) => {
                (StatusCode::GATEWAY_TIMEOUT, error.to_string()).into_response()
            }
        }
    }
}
