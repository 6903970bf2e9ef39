//! Tolerant parsing of free-text model responses into a summary and key points.
//!
//! Models usually follow the `SUMMARY:` / `KEY POINTS:` contract requested by the prompt, but
//! not always. Markers are matched case-insensitively and bullets are recognized by the
//! glyphs `-`, `*` and `•` only.

use std::sync::LazyLock;

use regex::Regex;

static SUMMARY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SUMMARY:").expect("summary marker pattern is valid"));
static KEY_POINTS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)KEY POINTS:").expect("key points marker pattern is valid"));

const BULLET_GLYPHS: [char; 3] = ['-', '*', '•'];

/// Summary text and key points recovered from a model response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSummary {
    /// Summary paragraph(s).
    pub summary: String,
    /// Key points in response order.
    pub key_points: Vec<String>,
}

/// Parse a raw model response.
pub fn parse_response(raw: &str) -> ParsedSummary {
    let key_points_marker = KEY_POINTS_MARKER.find(raw);

    let mut parsed = match SUMMARY_MARKER.find(raw) {
        Some(summary_marker) => {
            let after = &raw[summary_marker.end()..];
            let summary = match KEY_POINTS_MARKER.find(after) {
                Some(end) => &after[..end.start()],
                None => after,
            };
            ParsedSummary {
                summary: summary.trim().to_string(),
                key_points: Vec::new(),
            }
        }
        None => {
            let body = key_points_marker.map_or(raw, |marker| &raw[..marker.start()]);
            split_bullets(body)
        }
    };

    if let Some(marker) = key_points_marker {
        parsed.key_points = raw[marker.end()..].lines().filter_map(strip_bullet).collect();
    }

    parsed
}

/// Separate bullet lines from prose; without bullets the whole text is the summary.
fn split_bullets(text: &str) -> ParsedSummary {
    let mut prose = Vec::new();
    let mut key_points = Vec::new();
    let mut saw_bullet = false;

    for line in text.lines() {
        if is_bullet(line) {
            saw_bullet = true;
            key_points.extend(strip_bullet(line));
        } else {
            prose.push(line);
        }
    }

    if !saw_bullet {
        return ParsedSummary {
            summary: text.trim().to_string(),
            key_points,
        };
    }

    ParsedSummary {
        summary: prose.join("\n").trim().to_string(),
        key_points,
    }
}

fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET_GLYPHS)
}

/// Bullet content with glyph and surrounding whitespace removed; `None` for non-bullets or
/// empty bullets.
fn strip_bullet(line: &str) -> Option<String> {
    let content = line.trim().strip_prefix(BULLET_GLYPHS)?.trim();
    (!content.is_empty()).then(|| content.to_string())
}
