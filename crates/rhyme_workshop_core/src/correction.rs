//! crates/rhyme_workshop_core/src/correction.rs
//!
//! Applies one chosen suggestion to the poem text.

use regex::{Captures, RegexBuilder};

/// Replaces the first whole-word, case-insensitive occurrence of `original`
/// with `suggestion`, adapting the suggestion to the matched word's casing.
///
/// Returns `None` when `original` does not occur as a whole word.
pub fn apply_correction(text: &str, original: &str, suggestion: &str) -> Option<String> {
    let original = original.trim();
    if original.is_empty() {
        return None;
    }

    let pattern = format!(r"\b{}\b", regex::escape(original));
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;

    if !matcher.is_match(text) {
        return None;
    }
    let corrected = matcher.replacen(text, 1, |caps: &Captures<'_>| match_case(&caps[0], suggestion));
    Some(corrected.into_owned())
}

/// Shapes `suggestion` after `matched`: ALL CAPS, Title Case, or lowercase.
pub fn match_case(matched: &str, suggestion: &str) -> String {
    if is_all_upper(matched) {
        suggestion.to_uppercase()
    } else if is_title(matched) {
        to_title(suggestion)
    } else {
        suggestion.to_lowercase()
    }
}

fn is_all_upper(word: &str) -> bool {
    let mut cased = word.chars().filter(|c| c.is_uppercase() || c.is_lowercase()).peekable();
    cased.peek().is_some() && cased.all(char::is_uppercase)
}

/// Every alphabetic run starts with one uppercase letter followed by lowercase.
fn is_title(word: &str) -> bool {
    let mut previous_cased = false;
    let mut saw_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            saw_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            saw_cased = true;
        } else {
            previous_cased = false;
        }
    }
    saw_cased
}

fn to_title(word: &str) -> String {
    let mut titled = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_start {
                titled.extend(c.to_uppercase());
            } else {
                titled.extend(c.to_lowercase());
            }
            at_start = false;
        } else {
            titled.push(c);
            at_start = true;
        }
    }
    titled
}
