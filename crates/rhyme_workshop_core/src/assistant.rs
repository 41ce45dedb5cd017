//! crates/rhyme_workshop_core/src/assistant.rs
//!
//! The assistant call sites: themes, progression ideas, rhymes and the
//! spelling review. Every call degrades to `Fetched::Failed` instead of
//! returning an error, so the workflow never has to unwind.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Fetched, Issue, RhymeEntry};
use crate::payload::parse_payload;
use crate::ports::{GenerationOptions, PortResult, TextGenerationService};
use crate::prompts::{fill, ISSUES_TEMPLATE, PROGRESSION_TEMPLATE, RHYMES_TEMPLATE, THEMES_TEMPLATE};

const THEMES_FAILED: &str = "O Assistente teve um problema para criar temas. Tente novamente.";
const IDEAS_FAILED: &str = "O Assistente está descansando a criatividade. Tente de novo!";
const RHYMES_FAILED: &str = "O Assistente teve um problema para buscar rimas.";
const ISSUES_FAILED: &str = "O Assistente não conseguiu revisar o poema agora. Tente de novo!";

const RHYME_TEMPERATURE: f32 = 0.8;
const MAX_SUGGESTIONS: usize = 3;

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Debug, Deserialize)]
struct RhymeRecord {
    #[serde(alias = "palavra")]
    word: String,
    #[serde(alias = "definicao", default)]
    definition: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueRecord {
    original: String,
    suggestions: Vec<String>,
    #[serde(alias = "motivo", default)]
    reason: String,
    #[serde(alias = "verse_number")]
    verse_number: u32,
}

//=========================================================================================
// Assistant Calls
//=========================================================================================

/// Asks for poem themes related to what the child likes.
pub async fn generate_themes(
    ai: &dyn TextGenerationService,
    interest: &str,
) -> Fetched<Vec<String>> {
    let prompt = fill(THEMES_TEMPLATE, &[("interest", interest)]);
    match string_list(ai, &prompt).await {
        Ok(themes) if !themes.is_empty() => Fetched::Ready(themes),
        Ok(_) => {
            warn!("Theme generation returned no usable themes.");
            Fetched::Failed(THEMES_FAILED.to_string())
        }
        Err(e) => {
            warn!("Theme generation failed: {}", e);
            Fetched::Failed(THEMES_FAILED.to_string())
        }
    }
}

/// Asks for ideas that help the child move the poem forward.
pub async fn generate_progression_ideas(
    ai: &dyn TextGenerationService,
    theme: &str,
) -> Fetched<Vec<String>> {
    let prompt = fill(PROGRESSION_TEMPLATE, &[("theme", theme)]);
    match string_list(ai, &prompt).await {
        Ok(ideas) if !ideas.is_empty() => Fetched::Ready(ideas),
        Ok(_) => Fetched::Failed(IDEAS_FAILED.to_string()),
        Err(e) => {
            warn!("Progression idea generation failed: {}", e);
            Fetched::Failed(IDEAS_FAILED.to_string())
        }
    }
}

/// Looks up rhymes for `word`, never including `word` itself.
pub async fn find_rhymes(
    ai: &dyn TextGenerationService,
    word: &str,
    theme: &str,
) -> Fetched<Vec<RhymeEntry>> {
    let prompt = fill(RHYMES_TEMPLATE, &[("word", word), ("theme", theme)]);
    let options = GenerationOptions::with_temperature(RHYME_TEMPERATURE);

    let records: PortResult<Vec<RhymeRecord>> = match ai.generate(&prompt, options).await {
        Ok(raw) => parse_payload(&raw),
        Err(e) => Err(e),
    };

    match records {
        Ok(records) => {
            let queried = word.trim().to_lowercase();
            let rhymes = records
                .into_iter()
                .map(|r| RhymeEntry {
                    word: r.word.trim().to_string(),
                    definition: r.definition.trim().to_string(),
                })
                .filter(|r| !r.word.is_empty() && r.word.to_lowercase() != queried)
                .collect();
            Fetched::Ready(rhymes)
        }
        Err(e) => {
            warn!("Rhyme lookup for '{}' failed: {}", word, e);
            Fetched::Failed(RHYMES_FAILED.to_string())
        }
    }
}

/// Reviews the whole poem and returns every spelling/capitalization issue.
pub async fn find_issues(ai: &dyn TextGenerationService, poem: &str) -> Fetched<Vec<Issue>> {
    if poem.trim().is_empty() {
        return Fetched::Ready(Vec::new());
    }

    let prompt = fill(ISSUES_TEMPLATE, &[("poem", number_lines(poem).as_str())]);
    let records: PortResult<Vec<IssueRecord>> =
        match ai.generate(&prompt, GenerationOptions::default()).await {
            Ok(raw) => parse_payload(&raw),
            Err(e) => Err(e),
        };

    match records {
        Ok(records) => Fetched::Ready(records.into_iter().filter_map(into_issue).collect()),
        Err(e) => {
            warn!("Spelling review failed: {}", e);
            Fetched::Failed(ISSUES_FAILED.to_string())
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

async fn string_list(ai: &dyn TextGenerationService, prompt: &str) -> PortResult<Vec<String>> {
    let raw = ai.generate(prompt, GenerationOptions::default()).await?;
    let items: Vec<String> = parse_payload(&raw)?;
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

/// Prefixes each line with its 1-based number so verse numbers line up.
fn number_lines(poem: &str) -> String {
    poem.split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn into_issue(record: IssueRecord) -> Option<Issue> {
    let original = record.original.trim().to_string();
    let suggestions: Vec<String> = record
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();

    if original.is_empty() || suggestions.is_empty() || record.verse_number == 0 {
        warn!("Dropping unusable issue for '{}'.", original);
        return None;
    }
    debug!("Issue on verse {}: '{}'", record.verse_number, original);

    Some(Issue {
        original,
        suggestions,
        reason: record.reason.trim().to_string(),
        verse_number: record.verse_number,
    })
}
