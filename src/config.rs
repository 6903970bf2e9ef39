use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::summarization::SummarizerSettings;

/// Default base URL of the Generative Language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default per-request HTTP timeout applied by the Gemini transport.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the gistr binaries.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Opaque credential for the remote model API; `None` disables the remote path.
    pub gemini_api_key: Option<String>,
    /// Base URL of the remote model API.
    pub gemini_base_url: String,
    /// Static default models tried after any dynamically discovered ones.
    pub models: Vec<String>,
    /// Protocol versions tried, in order, for every model.
    pub api_versions: Vec<String>,
    /// Number of sentences selected by the extractive fallback.
    pub fallback_sentence_count: usize,
    /// Timeout applied to each HTTP request issued to the remote API.
    pub request_timeout_secs: u64,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SummarizerSettings::default();
        Ok(Self {
            gemini_api_key: load_env_optional("GEMINI_API_KEY"),
            gemini_base_url: load_env_optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            models: load_env_optional("GISTR_MODELS")
                .map(|value| parse_list(&value))
                .unwrap_or(defaults.static_models),
            api_versions: match load_env_optional("GISTR_API_VERSIONS") {
                Some(value) => {
                    let versions = parse_list(&value);
                    if versions.is_empty() {
                        return Err(ConfigError::InvalidValue("GISTR_API_VERSIONS".into()));
                    }
                    versions
                }
                None => defaults.api_versions,
            },
            fallback_sentence_count: load_env_optional("GISTR_FALLBACK_SENTENCES")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("GISTR_FALLBACK_SENTENCES".into()))
                })
                .transpose()?
                .unwrap_or(defaults.fallback_sentence_count),
            request_timeout_secs: load_env_optional("GISTR_REQUEST_TIMEOUT_SECS")
                .map(|value| {
                    value.parse().map_err(|_| {
                        ConfigError::InvalidValue("GISTR_REQUEST_TIMEOUT_SECS".into())
                    })
                })
                .transpose()?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }

    /// Settings handed to the summarization orchestrator.
    pub fn summarizer_settings(&self) -> SummarizerSettings {
        SummarizerSettings {
            static_models: self.models.clone(),
            api_versions: self.api_versions.clone(),
            fallback_sentence_count: self.fallback_sentence_count,
        }
    }

    /// Timeout applied to individual HTTP requests.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
///
/// The first successful load wins; later calls return the cached configuration.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        base_url = %config.gemini_base_url,
        has_api_key = config.gemini_api_key.is_some(),
        models = ?config.models,
        api_versions = ?config.api_versions,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_empty_items() {
        assert_eq!(
            parse_list(" gemini-pro, ,models/gemini-1.5-flash ,"),
            vec!["gemini-pro".to_string(), "models/gemini-1.5-flash".to_string()]
        );
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn init_config_caches_first_load() {
        let first = init_config().expect("config");
        let second = init_config().expect("config");
        assert!(std::ptr::eq(first, second));
        assert!(!second.api_versions.is_empty());
    }

    #[test]
    fn summarizer_settings_mirror_config() {
        let config = Config {
            gemini_api_key: Some("key".into()),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.into(),
            models: vec!["alpha".into()],
            api_versions: vec!["v1".into()],
            fallback_sentence_count: 3,
            request_timeout_secs: 7,
            server_port: None,
        };

        let settings = config.summarizer_settings();
        assert_eq!(settings.static_models, vec!["alpha".to_string()]);
        assert_eq!(settings.api_versions, vec!["v1".to_string()]);
        assert_eq!(settings.fallback_sentence_count, 3);
        assert_eq!(config.request_timeout(), Duration::from_secs(7));
    }
}
