//! Scripted in-memory transport shared by the summarization unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::transport::{ModelTransport, TransportError, TransportResponse};

#[derive(Clone)]
enum Reply {
    Response(TransportResponse),
    Failure(String),
}

/// Transport answering from a script and recording every call it receives.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    generate: HashMap<(String, String), Reply>,
    listings: HashMap<String, Reply>,
    delay: Option<Duration>,
    generate_calls: Mutex<Vec<(String, String)>>,
    list_calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_generate(
        mut self,
        model: &str,
        version: &str,
        response: TransportResponse,
    ) -> Self {
        self.generate.insert(
            (model.to_string(), version.to_string()),
            Reply::Response(response),
        );
        self
    }

    pub(crate) fn on_generate_failure(mut self, model: &str, version: &str, error: &str) -> Self {
        self.generate.insert(
            (model.to_string(), version.to_string()),
            Reply::Failure(error.to_string()),
        );
        self
    }

    pub(crate) fn on_list(mut self, version: &str, response: TransportResponse) -> Self {
        self.listings
            .insert(version.to_string(), Reply::Response(response));
        self
    }

    pub(crate) fn on_list_failure(mut self, version: &str, error: &str) -> Self {
        self.listings
            .insert(version.to_string(), Reply::Failure(error.to_string()));
        self
    }

    /// Sleep this long before answering any generate call.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn generate_calls(&self) -> Vec<(String, String)> {
        self.generate_calls.lock().expect("generate calls lock").clone()
    }

    pub(crate) fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().expect("list calls lock").clone()
    }
}

fn answer(
    reply: Option<&Reply>,
    fallback: TransportResponse,
) -> Result<TransportResponse, TransportError> {
    match reply {
        Some(Reply::Response(response)) => Ok(response.clone()),
        Some(Reply::Failure(error)) => Err(TransportError::InvalidUrl(error.clone())),
        None => Ok(fallback),
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    async fn generate(
        &self,
        model: &str,
        api_version: &str,
        _prompt: &str,
    ) -> Result<TransportResponse, TransportError> {
        self.generate_calls
            .lock()
            .expect("generate calls lock")
            .push((model.to_string(), api_version.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        answer(
            self.generate
                .get(&(model.to_string(), api_version.to_string())),
            error_reply(404, &format!("models/{model} is not found")),
        )
    }

    async fn list_models(&self, api_version: &str) -> Result<TransportResponse, TransportError> {
        self.list_calls
            .lock()
            .expect("list calls lock")
            .push(api_version.to_string());
        answer(
            self.listings.get(api_version),
            TransportResponse::new(404, Value::Null),
        )
    }
}

/// Successful `generateContent` response carrying `text`.
pub(crate) fn text_reply(text: &str) -> TransportResponse {
    TransportResponse::new(
        200,
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }),
    )
}

/// Error response with the standard error envelope.
pub(crate) fn error_reply(status: u16, message: &str) -> TransportResponse {
    TransportResponse::new(
        status,
        json!({ "error": { "code": status, "message": message } }),
    )
}

/// Successful model listing where every name supports `generateContent`.
pub(crate) fn listing(names: &[&str]) -> TransportResponse {
    let models: Vec<Value> = names
        .iter()
        .map(|name| json!({ "name": name, "supportedGenerationMethods": ["generateContent"] }))
        .collect();
    TransportResponse::new(200, json!({ "models": models }))
}

pub(crate) fn versions() -> Vec<String> {
    vec!["v1beta".into(), "v1".into()]
}
