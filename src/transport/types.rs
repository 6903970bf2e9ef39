//! Response envelope and the JSON shapes read out of it.

use serde::Deserialize;
use serde_json::Value;

/// Generation method a listed model must support to be usable for summaries.
pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// Raw outcome of one HTTP exchange with the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// Whether the status code is in the 2xx range.
    pub ok: bool,
    /// HTTP status code returned by the API.
    pub status: u16,
    /// Decoded JSON body; `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

impl TransportResponse {
    /// Build a response from a status code and an already decoded body.
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            body,
        }
    }

    /// Text at `candidates[0].content.parts[0].text`, when present and not blank.
    pub fn generated_text(&self) -> Option<String> {
        let payload = GenerateContentResponse::deserialize(&self.body).ok()?;
        payload
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }

    /// Diagnostic at `error.message`, when present.
    pub fn error_message(&self) -> Option<String> {
        ErrorEnvelope::deserialize(&self.body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .filter(|message| !message.trim().is_empty())
    }

    /// Names of listed models supporting [`GENERATE_CONTENT_METHOD`], sorted lexicographically.
    pub fn usable_model_names(&self) -> Vec<String> {
        let Ok(payload) = ModelListResponse::deserialize(&self.body) else {
            return Vec::new();
        };
        let mut names: Vec<String> = payload
            .models
            .into_iter()
            .filter(|model| {
                model
                    .supported_generation_methods
                    .iter()
                    .any(|method| method == GENERATE_CONTENT_METHOD)
            })
            .filter_map(|model| model.name)
            .collect();
        names.sort();
        names
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<ModelDescriptor>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelDescriptor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_flag_follows_status_class() {
        assert!(TransportResponse::new(200, Value::Null).ok);
        assert!(TransportResponse::new(204, Value::Null).ok);
        assert!(!TransportResponse::new(404, Value::Null).ok);
        assert!(!TransportResponse::new(500, Value::Null).ok);
    }

    #[test]
    fn generated_text_reads_first_candidate_part() {
        let response = TransportResponse::new(
            200,
            json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                    { "content": { "parts": [{ "text": "other" }] } }
                ]
            }),
        );
        assert_eq!(response.generated_text().as_deref(), Some("first"));
    }

    #[test]
    fn generated_text_is_none_for_missing_or_blank_text() {
        let missing = TransportResponse::new(200, json!({ "candidates": [] }));
        let blank = TransportResponse::new(
            200,
            json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] }),
        );
        let blocked = TransportResponse::new(
            200,
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
        );
        assert_eq!(missing.generated_text(), None);
        assert_eq!(blank.generated_text(), None);
        assert_eq!(blocked.generated_text(), None);
        assert_eq!(TransportResponse::new(200, Value::Null).generated_text(), None);
    }

    #[test]
    fn error_message_reads_error_envelope() {
        let response = TransportResponse::new(
            403,
            json!({ "error": { "code": 403, "message": "API key not valid" } }),
        );
        assert_eq!(response.error_message().as_deref(), Some("API key not valid"));
        assert_eq!(
            TransportResponse::new(500, json!("oops")).error_message(),
            None
        );
    }

    #[test]
    fn usable_model_names_filters_and_sorts() {
        let response = TransportResponse::new(
            200,
            json!({
                "models": [
                    {
                        "name": "models/gemini-pro",
                        "supportedGenerationMethods": ["generateContent"]
                    },
                    {
                        "name": "models/embedding-001",
                        "supportedGenerationMethods": ["embedContent"]
                    },
                    {
                        "name": "models/gemini-1.5-flash",
                        "supportedGenerationMethods": ["countTokens", "generateContent"]
                    },
                    { "supportedGenerationMethods": ["generateContent"] },
                    { "name": "models/aqa" }
                ]
            }),
        );
        assert_eq!(
            response.usable_model_names(),
            vec![
                "models/gemini-1.5-flash".to_string(),
                "models/gemini-pro".to_string()
            ]
        );
    }
}
