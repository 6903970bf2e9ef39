//! Prompt construction for the remote model.

use super::types::{LanguageHint, SummaryLength};

/// Maximum number of article characters embedded in a prompt.
pub const MAX_ARTICLE_CHARS: usize = 20_000;

/// Marker appended to an article that was cut at [`MAX_ARTICLE_CHARS`].
pub const TRUNCATION_MARKER: &str = "...";

/// Language used when the model cannot detect the article language.
pub const DEFAULT_LANGUAGE: &str = "English";

const KNOWN_LANGUAGES: [(&str, &str); 7] = [
    ("en", "English"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
];

/// Instruction fragment describing the requested length.
pub fn length_instruction(length: SummaryLength) -> &'static str {
    match length {
        SummaryLength::Short => "2–3 sentences",
        SummaryLength::Medium => "1 paragraph (4–6 sentences)",
        SummaryLength::Long => "2–3 paragraphs",
    }
}

/// Human-readable name for a supported language code.
pub fn language_name(code: &str) -> Option<&'static str> {
    KNOWN_LANGUAGES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Instruction telling the model which language to answer in.
pub fn language_instruction(hint: &LanguageHint) -> String {
    match hint {
        LanguageHint::Code(code) => match language_name(code) {
            Some(name) => format!("Write the summary and key points strictly in {name}."),
            None => detect_language_instruction(),
        },
        LanguageHint::Unknown => detect_language_instruction(),
    }
}

fn detect_language_instruction() -> String {
    format!(
        "Detect the article language and write both the summary and key points in that same \
         language. If unsure, default to {DEFAULT_LANGUAGE}."
    )
}

/// Cut `text` to [`MAX_ARTICLE_CHARS`] characters, appending [`TRUNCATION_MARKER`] when cut.
pub fn truncate_article(text: &str) -> String {
    match text.char_indices().nth(MAX_ARTICLE_CHARS) {
        Some((byte_offset, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_offset]),
        None => text.to_string(),
    }
}

/// Render the single instruction string sent to the remote model.
pub fn build_prompt(
    text: &str,
    length: SummaryLength,
    extract_key_points: bool,
    language_hint: &LanguageHint,
) -> String {
    let mut prompt = format!(
        "Summarize the following article in {}.\n\n",
        length_instruction(length)
    );
    prompt.push_str(&language_instruction(language_hint));
    prompt.push_str("\n\n");

    if extract_key_points {
        prompt.push_str("Then, extract 3-5 key points in bullet format.\n\n");
        prompt.push_str("Format your response as:\n");
        prompt.push_str("SUMMARY:\n[Your summary here]\n\n");
        prompt.push_str("KEY POINTS:\n- [Point 1]\n- [Point 2]\n...\n\n");
    } else {
        prompt.push_str("Provide only the summary.\n\n");
    }

    prompt.push_str("ARTICLE:\n");
    prompt.push_str(&truncate_article(text));
    prompt
}
