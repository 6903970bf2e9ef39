//! Ordered, deduplicated list of remote model candidates.
//!
//! Dynamically discovered models come first, then the static defaults. The merged list is
//! computed once per catalog and cached for the catalog's lifetime. The cache is never
//! invalidated, so models added or retired upstream after the first resolution are not seen
//! until the owning orchestrator is rebuilt.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use crate::transport::ModelTransport;

/// Where a candidate came from. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Returned by the transport's model listing.
    Dynamic,
    /// Part of the configured default list.
    Static,
}

/// A model identifier the cascade may try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    /// Identifier with any namespace prefix stripped.
    pub id: String,
    /// Provenance of the identifier.
    pub source: ModelSource,
}

/// Strip any namespace prefix (`models/gemini-pro` becomes `gemini-pro`).
pub fn canonical_model_id(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Merge dynamic and static names: drop empties, canonicalize, keep first occurrence.
pub fn merge_candidates(dynamic: &[String], static_models: &[String]) -> Vec<ModelCandidate> {
    let tagged = dynamic
        .iter()
        .map(|name| (name, ModelSource::Dynamic))
        .chain(static_models.iter().map(|name| (name, ModelSource::Static)));

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for (name, source) in tagged {
        let id = canonical_model_id(name);
        if id.is_empty() || !seen.insert(id.to_string()) {
            continue;
        }
        candidates.push(ModelCandidate {
            id: id.to_string(),
            source,
        });
    }
    candidates
}

/// Lazily resolved model catalog bound to one transport.
pub struct ModelCatalog {
    transport: Arc<dyn ModelTransport>,
    static_models: Vec<String>,
    api_versions: Vec<String>,
    resolved: OnceLock<Vec<ModelCandidate>>,
}

impl ModelCatalog {
    /// Build an unresolved catalog.
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        static_models: Vec<String>,
        api_versions: Vec<String>,
    ) -> Self {
        Self {
            transport,
            static_models,
            api_versions,
            resolved: OnceLock::new(),
        }
    }

    /// Candidates in cascade order, discovering models on first use.
    ///
    /// Concurrent first calls may each run discovery; the first result stored wins and every
    /// later call returns the cached list.
    pub async fn resolve(&self) -> &[ModelCandidate] {
        if let Some(candidates) = self.resolved.get() {
            return candidates;
        }

        let dynamic = self.discover().await;
        let candidates = merge_candidates(&dynamic, &self.static_models);
        tracing::info!(
            discovered = dynamic.len(),
            candidates = candidates.len(),
            "Resolved model catalog"
        );
        self.resolved.get_or_init(|| candidates)
    }

    /// First non-empty list of usable models across the configured versions, else empty.
    async fn discover(&self) -> Vec<String> {
        for version in &self.api_versions {
            match self.transport.list_models(version).await {
                Ok(response) if response.ok => {
                    let models = response.usable_model_names();
                    if !models.is_empty() {
                        tracing::debug!(
                            api_version = %version,
                            count = models.len(),
                            "Discovered models"
                        );
                        return models;
                    }
                    tracing::debug!(api_version = %version, "No usable models listed");
                }
                Ok(response) if response.status == 404 => {
                    tracing::debug!(api_version = %version, "Model listing not available");
                }
                Ok(response) => {
                    let message = response.error_message().unwrap_or_default();
                    tracing::warn!(
                        api_version = %version,
                        status = response.status,
                        error = %message,
                        "Failed to list models"
                    );
                }
                Err(error) => {
                    tracing::warn!(api_version = %version, error = %error, "Failed to list models");
                }
            }
        }
        Vec::new()
    }
}
