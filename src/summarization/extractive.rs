//! Deterministic extractive summarization based on in-document term frequency.
//!
//! Sentences are scored by the average document frequency of their content words; the
//! highest-scoring ones are returned in their original order. Key points are the most frequent
//! content words. There is no inverse-document-frequency component: the only corpus is the
//! article itself.

use std::collections::HashMap;

use super::types::{SummaryResult, SummarySource};

/// Default number of sentences (and key points) produced.
pub const DEFAULT_SENTENCE_COUNT: usize = 5;

/// Sentences shorter than this many characters are ignored.
pub const MIN_SENTENCE_CHARS: usize = 20;

/// Tokens of this many characters or fewer are ignored.
const MAX_SHORT_TOKEN_CHARS: usize = 3;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

const STOP_WORDS: &[&str] = &[
    "the", "and", "that", "this", "with", "for", "are", "was", "been", "have", "has", "had",
    "from", "they", "their", "there", "will", "would", "could", "should", "which", "what", "when",
    "where", "who", "why", "how", "about", "into", "through",
];

/// Options for the extractive summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractiveOptions {
    /// Maximum number of sentences in the summary and key points in the list.
    pub sentence_count: usize,
    /// Whether key points are produced.
    pub extract_key_points: bool,
}

impl Default for ExtractiveOptions {
    fn default() -> Self {
        Self {
            sentence_count: DEFAULT_SENTENCE_COUNT,
            extract_key_points: true,
        }
    }
}

/// Whether `word` (already lowercased) is in the fixed stop-word set.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lowercase, replace non-word characters with spaces and keep content words.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();

    normalized
        .split_whitespace()
        .filter(|word| word.chars().count() > MAX_SHORT_TOKEN_CHARS && !is_stop_word(word))
        .map(str::to_string)
        .collect()
}

/// Split on runs of `.`, `!` and `?`, keeping the terminator with its sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if !SENTENCE_TERMINATORS.contains(&c) {
            continue;
        }
        let mut end = index + c.len_utf8();
        while let Some(&(next_index, next)) = chars.peek() {
            if !SENTENCE_TERMINATORS.contains(&next) {
                break;
            }
            end = next_index + next.len_utf8();
            chars.next();
        }
        push_sentence(&mut sentences, &text[start..end]);
        start = end;
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, fragment: &str) {
    let sentence = fragment.trim();
    let body = sentence.trim_end_matches(SENTENCE_TERMINATORS).trim_end();
    if body.chars().count() >= MIN_SENTENCE_CHARS {
        sentences.push(sentence.to_string());
    }
}

/// Term frequencies over a token stream, remembering first-seen order.
#[derive(Debug, Default)]
struct TermFrequencies {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl TermFrequencies {
    fn from_tokens(tokens: Vec<String>) -> Self {
        let mut frequencies = Self::default();
        for token in tokens {
            match frequencies.counts.get_mut(&token) {
                Some(count) => *count += 1,
                None => {
                    frequencies.counts.insert(token.clone(), 1);
                    frequencies.order.push(token);
                }
            }
        }
        frequencies
    }

    fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// The `count` most frequent terms; ties keep first-seen order.
    fn top_terms(&self, count: usize) -> Vec<&str> {
        let mut ranked: Vec<&str> = self.order.iter().map(String::as_str).collect();
        ranked.sort_by(|left, right| self.get(right).cmp(&self.get(left)));
        ranked.truncate(count);
        ranked
    }
}

/// Average document frequency of the sentence's content words; 0 when it has none.
fn score_sentence(sentence: &str, frequencies: &TermFrequencies) -> f64 {
    let tokens = tokenize(sentence);
    let total: usize = tokens.iter().map(|token| frequencies.get(token)).sum();
    total as f64 / tokens.len().max(1) as f64
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Summarize `text` locally. Pure and deterministic.
pub fn summarize(text: &str, options: ExtractiveOptions) -> SummaryResult {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return SummaryResult {
            summary: String::new(),
            key_points: Vec::new(),
            source: SummarySource::Extractive,
        };
    }

    let frequencies = TermFrequencies::from_tokens(tokenize(text));

    let mut ranked: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| (index, score_sentence(sentence, &frequencies)))
        .collect();
    ranked.sort_by(|(left_index, left), (right_index, right)| {
        right.total_cmp(left).then(left_index.cmp(right_index))
    });
    ranked.truncate(options.sentence_count);

    let mut selected: Vec<usize> = ranked.into_iter().map(|(index, _)| index).collect();
    selected.sort_unstable();

    let summary = selected
        .into_iter()
        .map(|index| sentences[index].as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let key_points = if options.extract_key_points {
        frequencies
            .top_terms(options.sentence_count)
            .into_iter()
            .map(capitalize)
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        sentences = sentences.len(),
        distinct_terms = frequencies.order.len(),
        key_points = key_points.len(),
        "Built extractive summary"
    );

    SummaryResult {
        summary,
        key_points,
        source: SummarySource::Extractive,
    }
}
