//! Request, option and result types shared by both summarization strategies.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Requested summary length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// Two to three sentences.
    Short,
    /// One paragraph.
    #[default]
    Medium,
    /// Two to three paragraphs.
    Long,
}

impl std::str::FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(format!("unknown summary length '{other}'")),
        }
    }
}

/// Language the summary should be written in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LanguageHint {
    /// Let the model detect the article language.
    #[default]
    Unknown,
    /// Two-letter language code such as `fr`.
    Code(String),
}

impl LanguageHint {
    /// Interpret a raw hint; blank input and `unknown` map to [`LanguageHint::Unknown`].
    pub fn from_code(raw: &str) -> Self {
        let code = raw.trim().to_lowercase();
        if code.is_empty() || code == "unknown" {
            Self::Unknown
        } else {
            Self::Code(code)
        }
    }
}

/// Caller-tunable options for a single summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Target length of the summary.
    pub length: SummaryLength,
    /// Whether key points should be produced alongside the summary.
    pub extract_key_points: bool,
    /// Output language hint.
    pub language_hint: LanguageHint,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            length: SummaryLength::Medium,
            extract_key_points: true,
            language_hint: LanguageHint::Unknown,
        }
    }
}

/// One summarization call: article text, options and an optional deadline.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    text: String,
    options: SummaryOptions,
    deadline: Option<Instant>,
}

impl SummaryRequest {
    /// Create a request with default options and no deadline.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: SummaryOptions::default(),
            deadline: None,
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop the remote cascade once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Article text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Summary options.
    pub fn options(&self) -> &SummaryOptions {
        &self.options
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Strategy that produced a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummarySource {
    /// A remote model answered.
    Remote {
        /// Canonical model identifier.
        model: String,
        /// Protocol version that succeeded.
        api_version: String,
    },
    /// The local term-frequency algorithm produced the summary.
    Extractive,
}

/// Structured summary returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    /// Summary text; empty only when the input had no usable sentences.
    pub summary: String,
    /// Key points in the order they were discovered.
    pub key_points: Vec<String>,
    /// Strategy that produced this result.
    pub source: SummarySource,
}
