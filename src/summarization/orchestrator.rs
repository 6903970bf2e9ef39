//! Public entry point tying the remote cascade to the extractive fallback.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::cascade::{AttemptOutcome, RemoteSummarizer, within_deadline};
use super::catalog::ModelCatalog;
use super::errors::{ErrorClassification, SetupError, SummarizeError};
use super::extractive::{self, DEFAULT_SENTENCE_COUNT, ExtractiveOptions};
use super::prompt::build_prompt;
use super::types::{SummaryRequest, SummaryResult};
use crate::transport::ModelTransport;

/// Models tried after any discovered ones when nothing else is configured.
pub const DEFAULT_STATIC_MODELS: [&str; 4] = [
    "gemini-1.5-flash",
    "gemini-1.5-flash-002",
    "gemini-1.0-pro",
    "gemini-pro",
];

/// Protocol versions tried for every model when nothing else is configured.
pub const DEFAULT_API_VERSIONS: [&str; 2] = ["v1beta", "v1"];

/// Construction-time configuration for [`SummarizationOrchestrator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizerSettings {
    /// Static default models, tried after discovered ones.
    pub static_models: Vec<String>,
    /// Protocol versions tried, in order, for every model.
    pub api_versions: Vec<String>,
    /// Sentences (and key points) produced by the extractive fallback.
    pub fallback_sentence_count: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            static_models: DEFAULT_STATIC_MODELS.map(String::from).to_vec(),
            api_versions: DEFAULT_API_VERSIONS.map(String::from).to_vec(),
            fallback_sentence_count: DEFAULT_SENTENCE_COUNT,
        }
    }
}

fn dedupe_versions(versions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    versions
        .into_iter()
        .filter(|version| seen.insert(version.clone()))
        .collect()
}

struct RemotePath {
    catalog: ModelCatalog,
    summarizer: RemoteSummarizer,
}

/// Produces summaries, preferring remote models and degrading to the local algorithm.
///
/// Build one per process and share it behind an `Arc`; the model catalog it owns is resolved
/// on first use and reused by every later call.
pub struct SummarizationOrchestrator {
    remote: Option<RemotePath>,
    fallback_sentence_count: usize,
}

impl SummarizationOrchestrator {
    /// Create an orchestrator. Pass `None` as transport when no credential is configured.
    ///
    /// Repeated API versions are dropped, keeping the first occurrence.
    pub fn new(
        settings: SummarizerSettings,
        transport: Option<Arc<dyn ModelTransport>>,
    ) -> Result<Self, SetupError> {
        if settings.api_versions.is_empty() {
            return Err(SetupError::NoApiVersions);
        }
        if settings.fallback_sentence_count == 0 {
            return Err(SetupError::ZeroSentenceCount);
        }

        let api_versions = dedupe_versions(settings.api_versions);
        let remote = transport.map(|transport| RemotePath {
            catalog: ModelCatalog::new(
                transport.clone(),
                settings.static_models,
                api_versions.clone(),
            ),
            summarizer: RemoteSummarizer::new(transport, api_versions),
        });

        Ok(Self {
            remote,
            fallback_sentence_count: settings.fallback_sentence_count,
        })
    }

    /// Whether a remote transport is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Summarize `request`.
    ///
    /// Remote failures never reach the caller; they degrade to the extractive summary. The only
    /// error is [`SummarizeError::DeadlineExceeded`], returned when the request's deadline
    /// passes during the remote cascade.
    pub async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResult, SummarizeError> {
        let span = tracing::info_span!(
            "summarize",
            request_id = %Uuid::new_v4(),
            chars = request.text().chars().count()
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &SummaryRequest) -> Result<SummaryResult, SummarizeError> {
        let Some(remote) = &self.remote else {
            let reason = ErrorClassification::ConfigurationError("no API key configured".into());
            tracing::info!(reason = %reason, "Remote path skipped; using extractive summary");
            return Ok(self.fallback(request));
        };

        let deadline = request.deadline();
        let Some(candidates) = within_deadline(deadline, remote.catalog.resolve()).await else {
            tracing::warn!("Deadline passed while resolving model catalog");
            return Err(SummarizeError::DeadlineExceeded);
        };

        let options = request.options();
        let prompt = build_prompt(
            request.text(),
            options.length,
            options.extract_key_points,
            &options.language_hint,
        );

        let mut last_failure = None;
        for candidate in candidates {
            match remote
                .summarizer
                .attempt(&candidate.id, &prompt, deadline)
                .await
            {
                AttemptOutcome::Success(result) => return Ok(result),
                AttemptOutcome::Exhausted(classification) => {
                    tracing::debug!(
                        model = %candidate.id,
                        source = ?candidate.source,
                        error = %classification,
                        "Model unavailable; trying next candidate"
                    );
                    last_failure = Some(classification);
                }
                AttemptOutcome::Aborted(classification) => {
                    last_failure = Some(classification);
                    break;
                }
                AttemptOutcome::DeadlineExceeded => return Err(SummarizeError::DeadlineExceeded),
            }
        }

        match &last_failure {
            Some(classification) => tracing::warn!(
                classification = classification.label(),
                error = %classification,
                "Remote summarization failed; falling back to extractive summary"
            ),
            None => tracing::warn!("No model candidates available; using extractive summary"),
        }
        Ok(self.fallback(request))
    }

    fn fallback(&self, request: &SummaryRequest) -> SummaryResult {
        extractive::summarize(
            request.text(),
            ExtractiveOptions {
                sentence_count: self.fallback_sentence_count,
                extract_key_points: request.options().extract_key_points,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarization::testing::{ScriptedTransport, error_reply, listing, text_reply};
    use crate::summarization::types::{SummaryOptions, SummarySource};
    use crate::transport::TransportResponse;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    const ARTICLE: &str = "Solar panels convert sunlight into electricity for homes. \
        Solar adoption keeps growing across many regions every year. \
        Installation costs for solar panels have dropped sharply recently. \
        Some homeowners combine solar panels with battery storage systems. \
        Governments often offer incentives that make solar installations cheaper.";

    fn settings() -> SummarizerSettings {
        SummarizerSettings {
            static_models: vec!["a".into(), "b".into()],
            ..SummarizerSettings::default()
        }
    }

    fn orchestrator(transport: &Arc<ScriptedTransport>) -> SummarizationOrchestrator {
        SummarizationOrchestrator::new(settings(), Some(transport.clone())).expect("orchestrator")
    }

    fn models_called(transport: &ScriptedTransport) -> Vec<String> {
        transport
            .generate_calls()
            .into_iter()
            .map(|(model, version)| format!("{model}@{version}"))
            .collect()
    }

    #[test]
    fn construction_rejects_invalid_settings() {
        let no_versions = SummarizerSettings {
            api_versions: Vec::new(),
            ..SummarizerSettings::default()
        };
        assert_eq!(
            SummarizationOrchestrator::new(no_versions, None).err(),
            Some(SetupError::NoApiVersions)
        );

        let no_sentences = SummarizerSettings {
            fallback_sentence_count: 0,
            ..SummarizerSettings::default()
        };
        assert_eq!(
            SummarizationOrchestrator::new(no_sentences, None).err(),
            Some(SetupError::ZeroSentenceCount)
        );
    }

    #[tokio::test]
    async fn without_credential_uses_extractive_path() {
        let orchestrator = SummarizationOrchestrator::new(SummarizerSettings::default(), None)
            .expect("orchestrator");
        assert!(!orchestrator.has_remote());

        let result = orchestrator
            .summarize(&SummaryRequest::new(ARTICLE))
            .await
            .expect("summary");

        assert_eq!(result.source, SummarySource::Extractive);
        assert_eq!(result.summary, ARTICLE);
        assert!(!result.key_points.is_empty());
        assert_eq!(result.key_points[0], "Solar");
    }

    #[tokio::test]
    async fn second_version_success_short_circuits_remaining_models() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on_generate("a", "v1beta", error_reply(404, "model not found"))
                .on_generate("a", "v1", text_reply("SUMMARY: Remote.\nKEY POINTS:\n- r1")),
        );

        let result = orchestrator(&transport)
            .summarize(&SummaryRequest::new(ARTICLE))
            .await
            .expect("summary");

        assert_eq!(result.summary, "Remote.");
        assert_eq!(result.key_points, vec!["r1"]);
        assert_eq!(
            result.source,
            SummarySource::Remote {
                model: "a".into(),
                api_version: "v1".into()
            }
        );
        assert_eq!(models_called(&transport), vec!["a@v1beta", "a@v1"]);
    }

    #[tokio::test]
    async fn exhausted_model_advances_to_next_candidate() {
        let transport =
            Arc::new(ScriptedTransport::new().on_generate("b", "v1beta", text_reply("From b.")));

        let result = orchestrator(&transport)
            .summarize(&SummaryRequest::new(ARTICLE))
            .await
            .expect("summary");

        assert_eq!(result.summary, "From b.");
        assert_eq!(models_called(&transport), vec!["a@v1beta", "a@v1", "b@v1beta"]);
    }

    #[tokio::test]
    async fn permission_denied_falls_back_without_trying_more_models() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on_generate("a", "v1beta", error_reply(403, "denied"))
                .on_generate("a", "v1", text_reply("unused"))
                .on_generate("b", "v1beta", text_reply("unused")),
        );

        let result = orchestrator(&transport)
            .summarize(&SummaryRequest::new(ARTICLE))
            .await
            .expect("summary");

        assert_eq!(result.source, SummarySource::Extractive);
        assert!(!result.summary.is_empty());
        assert_eq!(models_called(&transport), vec!["a@v1beta"]);
    }

    #[tokio::test]
    async fn total_exhaustion_falls_back_to_extractive() {
        let transport = Arc::new(ScriptedTransport::new());

        let result = orchestrator(&transport)
            .summarize(&SummaryRequest::new(ARTICLE))
            .await
            .expect("summary");

        assert_eq!(result.source, SummarySource::Extractive);
        assert_eq!(
            models_called(&transport),
            vec!["a@v1beta", "a@v1", "b@v1beta", "b@v1"]
        );
    }

    #[tokio::test]
    async fn discovered_models_are_tried_first_and_catalog_is_reused() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on_list("v1beta", listing(&["models/b", "models/c"]))
                .on_generate("c", "v1beta", text_reply("From c.")),
        );
        let orchestrator = orchestrator(&transport);

        for _ in 0..2 {
            let result = orchestrator
                .summarize(&SummaryRequest::new(ARTICLE))
                .await
                .expect("summary");
            assert_eq!(result.summary, "From c.");
        }

        assert_eq!(transport.list_calls(), vec!["v1beta"]);
        assert_eq!(
            models_called(&transport),
            vec![
                "b@v1beta", "b@v1", "c@v1beta", "b@v1beta", "b@v1", "c@v1beta"
            ]
        );
    }

    #[tokio::test]
    async fn repeated_api_versions_are_tried_once() {
        let transport = Arc::new(ScriptedTransport::new());
        let settings = SummarizerSettings {
            static_models: vec!["a".into()],
            api_versions: vec!["v1".into(), "v1".into(), "v1beta".into(), "v1".into()],
            ..SummarizerSettings::default()
        };
        let orchestrator = SummarizationOrchestrator::new(settings, Some(transport.clone()))
            .expect("orchestrator");

        let result = orchestrator
            .summarize(&SummaryRequest::new(ARTICLE))
            .await
            .expect("summary");

        assert_eq!(result.source, SummarySource::Extractive);
        assert_eq!(models_called(&transport), vec!["a@v1", "a@v1beta"]);
        assert_eq!(transport.list_calls(), vec!["v1", "v1beta"]);
    }

    #[tokio::test]
    async fn empty_response_on_only_version_moves_to_next_model() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on_generate("a", "v1", TransportResponse::new(200, json!({ "candidates": [] })))
                .on_generate("b", "v1", text_reply("SUMMARY: From b.")),
        );
        let settings = SummarizerSettings {
            api_versions: vec!["v1".into()],
            ..settings()
        };
        let orchestrator = SummarizationOrchestrator::new(settings, Some(transport.clone()))
            .expect("orchestrator");

        let result = orchestrator
            .summarize(&SummaryRequest::new(ARTICLE))
            .await
            .expect("summary");

        assert_eq!(result.summary, "From b.");
        assert_eq!(
            result.source,
            SummarySource::Remote {
                model: "b".into(),
                api_version: "v1".into()
            }
        );
        assert_eq!(models_called(&transport), vec!["a@v1", "b@v1"]);
    }

    #[tokio::test]
    async fn key_point_option_reaches_fallback() {
        let orchestrator = SummarizationOrchestrator::new(SummarizerSettings::default(), None)
            .expect("orchestrator");
        let request = SummaryRequest::new(ARTICLE).with_options(SummaryOptions {
            extract_key_points: false,
            ..SummaryOptions::default()
        });

        let result = orchestrator.summarize(&request).await.expect("summary");
        assert!(result.key_points.is_empty());
    }

    #[tokio::test]
    async fn expired_deadline_is_surfaced_not_absorbed() {
        let transport = Arc::new(ScriptedTransport::new());
        let request =
            SummaryRequest::new(ARTICLE).with_deadline(Instant::now() - Duration::from_millis(1));

        let outcome = orchestrator(&transport).summarize(&request).await;

        assert_eq!(outcome, Err(SummarizeError::DeadlineExceeded));
        assert!(transport.generate_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_during_cascade_stops_further_candidates() {
        let transport = Arc::new(ScriptedTransport::new().with_delay(Duration::from_secs(3)));
        let request =
            SummaryRequest::new(ARTICLE).with_deadline(Instant::now() + Duration::from_secs(5));

        let outcome = orchestrator(&transport).summarize(&request).await;

        assert_eq!(outcome, Err(SummarizeError::DeadlineExceeded));
        assert_eq!(models_called(&transport), vec!["a@v1beta", "a@v1"]);
    }
}
