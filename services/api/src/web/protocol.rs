//! services/api/src/web/protocol.rs
//!
//! Defines the JSON messages exchanged between the browser client and the
//! API server for the poetry workshop.

use rhyme_workshop_core::domain::{Fetched, Issue, RhymeEntry, Session};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Requests FROM the Client (Browser) TO the Server
//=========================================================================================

/// What the child wrote about the things they like.
#[derive(Deserialize, Debug, ToSchema)]
pub struct InterestRequest {
    pub interest: String,
}

/// One of the themes offered in `choosing_theme`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct ThemeRequest {
    pub theme: String,
}

/// The full editor contents.
#[derive(Deserialize, Debug, ToSchema)]
pub struct PoemRequest {
    pub text: String,
}

/// A suggestion button press: replace one occurrence of `original`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct CorrectionRequest {
    pub original: String,
    pub suggestion: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RhymeRequest {
    pub word: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct PdfRequest {
    pub title: String,
    pub author: String,
}

//=========================================================================================
// Responses FROM the Server TO the Client (Browser)
//=========================================================================================

#[derive(Serialize, Debug, ToSchema)]
pub struct StatsView {
    pub verses: usize,
    pub stanzas: usize,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct IssueView {
    pub original: String,
    pub suggestions: Vec<String>,
    pub reason: String,
}

/// All issues found on one verse.
#[derive(Serialize, Debug, ToSchema)]
pub struct VerseIssuesView {
    pub verse_number: u32,
    pub issues: Vec<IssueView>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RhymeView {
    pub word: String,
    pub definition: String,
}

/// The last rhyme lookup. An empty `entries` with no `error` means nothing rhymes.
#[derive(Serialize, Debug, ToSchema)]
pub struct RhymesView {
    pub word: String,
    pub entries: Vec<RhymeView>,
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PdfView {
    pub file_name: String,
    pub size_bytes: usize,
    pub download_url: String,
}

/// Everything the client needs to draw the current stage.
#[derive(Serialize, Debug, ToSchema)]
pub struct SessionView {
    pub session_id: Uuid,
    pub stage: String,
    pub interest_text: String,
    pub themes: Vec<String>,
    pub themes_error: Option<String>,
    pub chosen_theme: String,
    pub progression_ideas: Vec<String>,
    pub progression_ideas_error: Option<String>,
    pub poem_text: String,
    pub stats: StatsView,
    pub issues: Vec<VerseIssuesView>,
    pub issues_error: Option<String>,
    pub rhymes: Option<RhymesView>,
    pub pdf: Option<PdfView>,
}

fn split<T, V>(fetched: &Fetched<Vec<T>>, view: impl Fn(&T) -> V) -> (Vec<V>, Option<String>) {
    match fetched {
        Fetched::Ready(items) => (items.iter().map(view).collect(), None),
        Fetched::Failed(message) => (Vec::new(), Some(message.clone())),
    }
}

fn issue_view(issue: &Issue) -> IssueView {
    IssueView {
        original: issue.original.clone(),
        suggestions: issue.suggestions.clone(),
        reason: issue.reason.clone(),
    }
}

fn rhyme_view(entry: &RhymeEntry) -> RhymeView {
    RhymeView {
        word: entry.word.clone(),
        definition: entry.definition.clone(),
    }
}

impl SessionView {
    pub fn from_session(session_id: Uuid, session: &Session) -> Self {
        let (themes, themes_error) = split(&session.themes, String::clone);
        let (progression_ideas, progression_ideas_error) =
            split(&session.progression_ideas, String::clone);
        let stats = session.stats();

        let issues = session
            .issues_by_verse()
            .into_iter()
            .map(|(verse_number, issues)| VerseIssuesView {
                verse_number,
                issues: issues.into_iter().map(issue_view).collect(),
            })
            .collect();

        let rhymes = session.rhymes.as_ref().map(|lookup| {
            let (entries, error) = split(&lookup.result, rhyme_view);
            RhymesView {
                word: lookup.word.clone(),
                entries,
                error,
            }
        });

        let pdf = session.pdf.as_ref().map(|pdf| PdfView {
            file_name: pdf.file_name.clone(),
            size_bytes: pdf.bytes.len(),
            download_url: format!("/sessions/{}/pdf", session_id),
        });

        Self {
            session_id,
            stage: session.stage.as_str().to_string(),
            interest_text: session.interest_text.clone(),
            themes,
            themes_error,
            chosen_theme: session.chosen_theme.clone(),
            progression_ideas,
            progression_ideas_error,
            poem_text: session.poem_text.clone(),
            stats: StatsView {
                verses: stats.verses,
                stanzas: stats.stanzas,
            },
            issues,
            issues_error: session.issues.failure().map(str::to_string),
            rhymes,
            pdf,
        }
    }
}
