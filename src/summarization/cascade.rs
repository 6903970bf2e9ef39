//! Per-model attempt across the configured protocol versions.

use std::future::Future;
use std::sync::Arc;

use tokio::time::Instant;

use super::errors::{ErrorClassification, classify_failure, classify_transport_error};
use super::parser::parse_response;
use super::types::{SummaryResult, SummarySource};
use crate::transport::ModelTransport;

/// Result of trying one model against every protocol version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A version produced text.
    Success(SummaryResult),
    /// Every version failed with a classification that allows trying the next model.
    Exhausted(ErrorClassification),
    /// A version failed in a way that rules out further remote attempts.
    Aborted(ErrorClassification),
    /// The caller's deadline passed before this model produced an answer.
    DeadlineExceeded,
}

/// Await `future`, giving up with `None` once `deadline` passes.
pub(crate) async fn within_deadline<F: Future>(
    deadline: Option<Instant>,
    future: F,
) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}

/// Runs the version loop for a single model.
pub struct RemoteSummarizer {
    transport: Arc<dyn ModelTransport>,
    api_versions: Vec<String>,
}

impl RemoteSummarizer {
    /// Create a summarizer trying `api_versions` in order.
    pub fn new(transport: Arc<dyn ModelTransport>, api_versions: Vec<String>) -> Self {
        Self {
            transport,
            api_versions,
        }
    }

    /// Try `model` with `prompt` against each version in order.
    ///
    /// Only `NotFoundOrUnsupported`, and `EmptyResponse` on the first version, move on to the
    /// next version. Anything else aborts immediately.
    pub async fn attempt(
        &self,
        model: &str,
        prompt: &str,
        deadline: Option<Instant>,
    ) -> AttemptOutcome {
        let mut last_failure = None;

        for (position, version) in self.api_versions.iter().enumerate() {
            if deadline_passed(deadline) {
                return AttemptOutcome::DeadlineExceeded;
            }

            tracing::debug!(model, api_version = %version, "Attempting remote summary");
            let call = self.transport.generate(model, version, prompt);
            let Some(result) = within_deadline(deadline, call).await else {
                tracing::warn!(model, api_version = %version, "Deadline passed during remote call");
                return AttemptOutcome::DeadlineExceeded;
            };

            let classification = match result {
                Ok(response) if response.ok => match response.generated_text() {
                    Some(text) => {
                        let parsed = parse_response(&text);
                        tracing::info!(model, api_version = %version, "Remote summary succeeded");
                        return AttemptOutcome::Success(SummaryResult {
                            summary: parsed.summary,
                            key_points: parsed.key_points,
                            source: SummarySource::Remote {
                                model: model.to_string(),
                                api_version: version.clone(),
                            },
                        });
                    }
                    None => ErrorClassification::EmptyResponse(format!(
                        "No text returned for model {model} (version {version})"
                    )),
                },
                Ok(response) => classify_failure(&response),
                Err(error) => classify_transport_error(&error),
            };

            let advance = match &classification {
                ErrorClassification::NotFoundOrUnsupported(_) => true,
                ErrorClassification::EmptyResponse(_) => position == 0,
                _ => false,
            };

            tracing::warn!(
                model,
                api_version = %version,
                classification = classification.label(),
                error = %classification,
                advance,
                "Remote summary attempt failed"
            );

            if !advance {
                return AttemptOutcome::Aborted(classification);
            }
            last_failure = Some(classification);
        }

        AttemptOutcome::Exhausted(last_failure.unwrap_or_else(|| {
            ErrorClassification::NotFoundOrUnsupported(format!(
                "No API versions available for model {model}"
            ))
        }))
    }
}
