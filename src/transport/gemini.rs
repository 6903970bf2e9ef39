//! Reqwest-backed transport for the Generative Language (Gemini) REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::{Value, json};

use super::{ModelTransport, TransportError, TransportResponse};
use crate::config::{Config, DEFAULT_GEMINI_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

const API_KEY_HEADER: &str = "x-goog-api-key";
const TEMPERATURE: f32 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Lightweight HTTP client for Gemini `generateContent` and model listing.
pub struct GeminiTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiTransport {
    /// Construct a transport against the public endpoint with default timeouts.
    pub fn new(api_key: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_base_url(
            api_key,
            DEFAULT_GEMINI_BASE_URL,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Construct a transport against an explicit base URL.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent("gistr/0.1")
            .timeout(timeout)
            .build()?;
        let base_url = normalize_base_url(base_url).map_err(TransportError::InvalidUrl)?;
        tracing::debug!(url = %base_url, ?timeout, "Initialized Gemini HTTP client");

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Build a transport from runtime configuration; `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, TransportError> {
        config
            .gemini_api_key
            .as_deref()
            .map(|key| Self::with_base_url(key, &config.gemini_base_url, config.request_timeout()))
            .transpose()
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.client
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn generate(
        &self,
        model: &str,
        api_version: &str,
        prompt: &str,
    ) -> Result<TransportResponse, TransportError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            }
        });

        let response = self
            .request(
                Method::POST,
                &format!("{api_version}/models/{model}:generateContent"),
            )
            .json(&body)
            .send()
            .await?;

        into_transport_response(response).await
    }

    async fn list_models(&self, api_version: &str) -> Result<TransportResponse, TransportError> {
        let response = self
            .request(Method::GET, &format!("{api_version}/models"))
            .send()
            .await?;

        into_transport_response(response).await
    }
}

async fn into_transport_response(
    response: reqwest::Response,
) -> Result<TransportResponse, TransportError> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    Ok(TransportResponse::new(status, body))
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("base URL must not be empty".into());
    }
    let url = Url::parse(trimmed).map_err(|error| format!("{trimmed}: {error}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
        scheme => Err(format!("{trimmed}: unsupported scheme '{scheme}'")),
    }
}
