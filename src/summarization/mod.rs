//! Article summarization: remote model cascade with a local extractive fallback.
//!
//! [`SummarizationOrchestrator`] is the entry point. When a [`crate::transport::ModelTransport`]
//! is configured it resolves a [`ModelCatalog`] of candidate models, tries each one across the
//! configured API versions, and returns the first parsed answer. When no transport is configured,
//! or the remote path fails for any reason other than the caller's deadline, the deterministic
//! [`extractive`] summarizer produces the result instead.

pub mod cascade;
pub mod catalog;
pub mod errors;
pub mod extractive;
mod orchestrator;
pub mod parser;
pub mod prompt;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use cascade::{AttemptOutcome, RemoteSummarizer};
pub use catalog::{ModelCandidate, ModelCatalog, ModelSource};
pub use errors::{ErrorClassification, SetupError, SummarizeError};
pub use extractive::ExtractiveOptions;
pub use orchestrator::{
    DEFAULT_API_VERSIONS, DEFAULT_STATIC_MODELS, SummarizationOrchestrator, SummarizerSettings,
};
pub use parser::{ParsedSummary, parse_response};
pub use prompt::build_prompt;
pub use types::{
    LanguageHint, SummaryLength, SummaryOptions, SummaryRequest, SummaryResult, SummarySource,
};
