//! crates/rhyme_workshop_core/src/payload.rs
//!
//! Turns raw model output into typed values. Models like to wrap JSON in
//! markdown fences, prefix it with a language tag, or add a sentence of
//! chatter around it; all of that is stripped before strict parsing.

use serde::de::DeserializeOwned;

use crate::ports::PortError;

/// Removes markdown code fences and a leading language tag.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    let text = text.trim();
    for tag in ["json", "python"] {
        if let Some(rest) = text.strip_prefix(tag) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    text
}

/// Returns the outermost JSON array or object embedded in `text`.
///
/// Falls back to the trimmed text when no bracket pair is found, so that the
/// parser reports the real problem.
pub fn extract_json(text: &str) -> &str {
    let text = strip_fences(text);
    let start = match text.find(|c: char| c == '[' || c == '{') {
        Some(start) => start,
        None => return text,
    };
    let close = if text[start..].starts_with('[') { ']' } else { '}' };
    match text.rfind(close) {
        Some(end) if end > start => &text[start..=end],
        _ => text,
    }
}

/// Strictly deserializes the JSON payload found in a model response.
pub fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T, PortError> {
    let json = extract_json(raw);
    serde_json::from_str(json).map_err(|e| PortError::Malformed(e.to_string()))
}
