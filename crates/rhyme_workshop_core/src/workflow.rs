//! crates/rhyme_workshop_core/src/workflow.rs
//!
//! The workshop's state machine:
//!
//! `getting_interest -> choosing_theme -> writing_poem -> finalizing_poem`
//!
//! with one backward edge from `finalizing_poem` to `writing_poem`. Every
//! operation checks its stage and its preconditions before touching the
//! session, so a rejected action leaves the session exactly as it was.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::assistant;
use crate::correction;
use crate::domain::{Fetched, GeneratedPdf, PoemDocument, RhymeLookup, Session, Stage};
use crate::ports::{PoemRenderer, TextGenerationService};
use crate::style::resolve_style;

//=========================================================================================
// Stage Errors
//=========================================================================================

/// Why a user action did not advance the workflow.
///
/// Everything except `WrongStage` and `RenderFailed` is a validation warning
/// meant to be shown to the child.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("Action only allowed in stage '{expected}', session is in '{actual}'")]
    WrongStage { expected: Stage, actual: Stage },
    #[error("Escreva algo que você gosta para a gente começar!")]
    EmptyInterest,
    #[error("{0}")]
    ThemesUnavailable(String),
    #[error("O tema '{0}' não está entre as ideias sugeridas.")]
    ThemeNotOffered(String),
    #[error("Escreva seu poema antes de concluir!")]
    BlankPoem,
    #[error("Digite uma palavra para buscar rimas!")]
    EmptyRhymeWord,
    #[error("Por favor, preencha o título e o seu nome!")]
    MissingTitleOrAuthor,
    #[error("A palavra '{0}' não foi encontrada no poema.")]
    WordNotFound(String),
    #[error("O Assistente não conseguiu criar o PDF: {0}")]
    RenderFailed(String),
}

impl StageError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, StageError::WrongStage { .. } | StageError::RenderFailed(_))
    }
}

fn expect_stage(session: &Session, expected: Stage) -> Result<(), StageError> {
    if session.stage == expected {
        Ok(())
    } else {
        Err(StageError::WrongStage {
            expected,
            actual: session.stage,
        })
    }
}

/// Builds the download name: every run of characters outside `[A-Za-z0-9]`
/// becomes a single underscore.
pub fn pdf_file_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 4);
    let mut in_run = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
            in_run = false;
        } else if !in_run {
            name.push('_');
            in_run = true;
        }
    }
    name.push_str(".pdf");
    name
}

//=========================================================================================
// The Workshop Controller
//=========================================================================================

/// Drives a `Session` through the workshop using the assistant and renderer ports.
#[derive(Clone)]
pub struct Workshop {
    ai: Arc<dyn TextGenerationService>,
    renderer: Arc<dyn PoemRenderer>,
}

impl Workshop {
    pub fn new(ai: Arc<dyn TextGenerationService>, renderer: Arc<dyn PoemRenderer>) -> Self {
        Self { ai, renderer }
    }

    /// `getting_interest -> choosing_theme`. Theme generation failures are
    /// stored in the session and surfaced in the next stage.
    pub async fn submit_interest(&self, session: &mut Session, interest: &str) -> Result<(), StageError> {
        expect_stage(session, Stage::GettingInterest)?;
        let interest = interest.trim();
        if interest.is_empty() {
            return Err(StageError::EmptyInterest);
        }

        let themes = assistant::generate_themes(self.ai.as_ref(), interest).await;
        session.interest_text = interest.to_string();
        session.themes = themes;
        session.stage = Stage::ChoosingTheme;
        info!("Interest captured, moving to {}.", session.stage);
        Ok(())
    }

    /// Asks for a fresh set of themes from the stored interest.
    pub async fn refresh_themes(&self, session: &mut Session) -> Result<(), StageError> {
        expect_stage(session, Stage::ChoosingTheme)?;
        session.themes = assistant::generate_themes(self.ai.as_ref(), &session.interest_text).await;
        Ok(())
    }

    /// `choosing_theme -> writing_poem`. The theme must be one of those offered.
    pub async fn choose_theme(&self, session: &mut Session, theme: &str) -> Result<(), StageError> {
        expect_stage(session, Stage::ChoosingTheme)?;
        let offered = match &session.themes {
            Fetched::Ready(themes) => themes,
            Fetched::Failed(message) => return Err(StageError::ThemesUnavailable(message.clone())),
        };
        let theme = theme.trim();
        let chosen = offered
            .iter()
            .find(|t| t.as_str() == theme)
            .cloned()
            .ok_or_else(|| StageError::ThemeNotOffered(theme.to_string()))?;

        session.progression_ideas =
            assistant::generate_progression_ideas(self.ai.as_ref(), &chosen).await;
        session.chosen_theme = chosen;
        session.stage = Stage::WritingPoem;
        info!("Theme '{}' chosen, moving to {}.", session.chosen_theme, session.stage);
        Ok(())
    }

    /// Replaces the poem text with the editor contents.
    pub fn update_poem(&self, session: &mut Session, text: &str) -> Result<(), StageError> {
        expect_stage(session, Stage::WritingPoem)?;
        session.poem_text = text.to_string();
        Ok(())
    }

    /// Re-checks the whole poem; the previous issue list is replaced wholesale.
    pub async fn check_spelling(&self, session: &mut Session) -> Result<(), StageError> {
        expect_stage(session, Stage::WritingPoem)?;
        session.issues = assistant::find_issues(self.ai.as_ref(), &session.poem_text).await;
        Ok(())
    }

    /// Fixes one occurrence of `original`, then re-checks the full poem.
    pub async fn apply_correction(
        &self,
        session: &mut Session,
        original: &str,
        suggestion: &str,
    ) -> Result<(), StageError> {
        expect_stage(session, Stage::WritingPoem)?;
        let corrected = correction::apply_correction(&session.poem_text, original, suggestion)
            .ok_or_else(|| StageError::WordNotFound(original.to_string()))?;

        session.poem_text = corrected;
        session.issues = assistant::find_issues(self.ai.as_ref(), &session.poem_text).await;
        Ok(())
    }

    pub async fn find_rhymes(&self, session: &mut Session, word: &str) -> Result<(), StageError> {
        expect_stage(session, Stage::WritingPoem)?;
        let word = word.trim();
        if word.is_empty() {
            return Err(StageError::EmptyRhymeWord);
        }
        let result = assistant::find_rhymes(self.ai.as_ref(), word, &session.chosen_theme).await;
        session.rhymes = Some(RhymeLookup {
            word: word.to_string(),
            result,
        });
        Ok(())
    }

    /// `writing_poem -> finalizing_poem`, only with a non-blank poem.
    pub fn finish_poem(&self, session: &mut Session) -> Result<(), StageError> {
        expect_stage(session, Stage::WritingPoem)?;
        if session.poem_text.trim().is_empty() {
            return Err(StageError::BlankPoem);
        }
        session.stage = Stage::FinalizingPoem;
        session.pdf = None;
        Ok(())
    }

    /// Resolves a style and renders a brand-new PDF. Nothing is cached
    /// between submissions.
    pub async fn generate_pdf(
        &self,
        session: &mut Session,
        title: &str,
        author: &str,
    ) -> Result<(), StageError> {
        expect_stage(session, Stage::FinalizingPoem)?;
        let (title, author) = (title.trim(), author.trim());
        if title.is_empty() || author.is_empty() {
            return Err(StageError::MissingTitleOrAuthor);
        }

        let style = resolve_style(self.ai.as_ref(), &session.chosen_theme, &session.poem_text).await;
        let poem = PoemDocument {
            title: title.to_string(),
            author: author.to_string(),
            body: session.poem_text.clone(),
        };
        let bytes = self.renderer.render(&poem, &style).map_err(|e| {
            warn!("PDF rendering failed: {}", e);
            StageError::RenderFailed(e.to_string())
        })?;

        let file_name = pdf_file_name(title);
        info!(
            "Generated '{}' ({} bytes) at {}.",
            file_name,
            bytes.len(),
            Local::now().format("%H:%M:%S")
        );
        session.pdf = Some(GeneratedPdf { file_name, bytes });
        Ok(())
    }

    /// `finalizing_poem -> writing_poem`, discarding any generated PDF.
    pub fn back_to_writing(&self, session: &mut Session) -> Result<(), StageError> {
        expect_stage(session, Stage::FinalizingPoem)?;
        session.stage = Stage::WritingPoem;
        session.pdf = None;
        Ok(())
    }
}
