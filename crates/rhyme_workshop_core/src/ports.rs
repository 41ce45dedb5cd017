//! crates/rhyme_workshop_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of a specific AI provider or PDF library.

use async_trait::async_trait;

use crate::domain::{PoemDocument, StyleDescriptor};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The service is not configured (e.g. missing credentials).
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Per-call tuning for the text generator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
}

impl GenerationOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
        }
    }
}

/// The AI gateway: prompt in, free text out.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> PortResult<String>;
}

/// Turns a finished poem and its style into downloadable document bytes.
pub trait PoemRenderer: Send + Sync {
    fn render(&self, poem: &PoemDocument, style: &StyleDescriptor) -> PortResult<Vec<u8>>;
}
