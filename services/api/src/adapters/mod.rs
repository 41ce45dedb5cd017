pub mod assistant_llm;
pub mod pdf;

pub use assistant_llm::{OpenAiTextAdapter, UnavailableTextAdapter};
pub use pdf::{PrintPdfCanvas, PrintPdfRenderer};

use crate::config::Config;
use async_openai::{config::OpenAIConfig, Client};
use rhyme_workshop_core::ports::TextGenerationService;
use std::sync::Arc;
use tracing::{info, warn};

/// Chooses the text generator for the configured credentials, falling back
/// to `UnavailableTextAdapter` when no key is set.
pub fn text_generator(config: &Config) -> Arc<dyn TextGenerationService> {
    let Some(credentials) = config.assistant_credentials() else {
        warn!("No assistant API key configured; suggestions will be unavailable.");
        return Arc::new(UnavailableTextAdapter);
    };

    let mut openai_config = OpenAIConfig::new().with_api_key(credentials.api_key);
    if let Some(api_base) = credentials.api_base {
        info!("Using assistant endpoint {}", api_base);
        openai_config = openai_config.with_api_base(api_base);
    }
    Arc::new(OpenAiTextAdapter::new(
        Client::with_config(openai_config),
        config.assistant_model.clone(),
    ))
}
