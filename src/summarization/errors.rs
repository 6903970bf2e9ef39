//! Error taxonomy for the summarization pipeline.
//!
//! Remote failures are classified exactly once, where a [`TransportResponse`] (or a
//! [`TransportError`]) is turned into an [`ErrorClassification`]. Everything downstream
//! dispatches on the variant and never inspects the message text again.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::transport::{TransportError, TransportResponse};

static MODEL_UNAVAILABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)model.*(not\s+found|not\s+exist|not\s+supported)")
        .expect("model-unavailable pattern is valid")
});

/// Outcome of a failed remote attempt, carrying the original diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorClassification {
    /// Model or protocol version does not exist or cannot generate content.
    #[error("Model not found or unsupported: {0}")]
    NotFoundOrUnsupported(String),
    /// Credential lacks access to the model.
    #[error("Access denied: {0}")]
    PermissionDenied(String),
    /// Rate limit or quota exhausted.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
    /// Any other failure, including network errors.
    #[error("Remote request failed: {0}")]
    Transient(String),
    /// No credential is configured, so the remote path cannot run.
    #[error("Remote summarization not configured: {0}")]
    ConfigurationError(String),
    /// Call succeeded but carried no generated text.
    #[error("Model returned no text: {0}")]
    EmptyResponse(String),
}

impl ErrorClassification {
    /// Short machine-friendly label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFoundOrUnsupported(_) => "not_found_or_unsupported",
            Self::PermissionDenied(_) => "permission_denied",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::Transient(_) => "transient",
            Self::ConfigurationError(_) => "configuration_error",
            Self::EmptyResponse(_) => "empty_response",
        }
    }
}

/// Classify a non-success response from `generate`.
pub fn classify_failure(response: &TransportResponse) -> ErrorClassification {
    let message = response
        .error_message()
        .unwrap_or_else(|| format!("Request failed with status {}", response.status));

    match response.status {
        404 => ErrorClassification::NotFoundOrUnsupported(message),
        _ if MODEL_UNAVAILABLE.is_match(&message) => {
            ErrorClassification::NotFoundOrUnsupported(message)
        }
        403 => ErrorClassification::PermissionDenied(message),
        429 => ErrorClassification::QuotaExceeded(message),
        _ => ErrorClassification::Transient(message),
    }
}

/// Classify a failure that happened before any response was received.
pub fn classify_transport_error(error: &TransportError) -> ErrorClassification {
    ErrorClassification::Transient(error.to_string())
}

/// Failures surfaced to callers of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    /// The caller-supplied deadline passed before a summary was produced.
    #[error("Summarization deadline exceeded")]
    DeadlineExceeded,
}

/// Programmer errors detected while constructing the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// At least one protocol version is required to reach the remote API.
    #[error("At least one API version must be configured")]
    NoApiVersions,
    /// The extractive fallback must select at least one sentence.
    #[error("Fallback sentence count must be greater than zero")]
    ZeroSentenceCount,
}
