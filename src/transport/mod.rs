//! HTTP-shaped capabilities the summarization core consumes.
//!
//! The core never talks to the network directly. It is handed a [`ModelTransport`] that can
//! generate text for one `(model, api_version)` pair and list the models a version exposes.
//! Responses are returned verbatim (status plus JSON body) so that failure classification
//! happens in exactly one place, inside the cascade.

mod gemini;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiTransport;
pub use types::TransportResponse;

/// Errors raised before a response could be obtained from the remote API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Capabilities the summarization core needs from a remote model provider.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Ask `model` to complete `prompt` using protocol version `api_version`.
    async fn generate(
        &self,
        model: &str,
        api_version: &str,
        prompt: &str,
    ) -> Result<TransportResponse, TransportError>;

    /// List the models exposed by protocol version `api_version`.
    async fn list_models(&self, api_version: &str) -> Result<TransportResponse, TransportError>;
}
