//! services/api/src/adapters/assistant_llm.rs
//!
//! This module contains the adapters behind the `TextGenerationService` port:
//! one backed by an OpenAI-compatible chat model, and one used when no
//! credentials are configured.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use rhyme_workshop_core::ports::{
    GenerationOptions, PortError, PortResult, TextGenerationService,
};
use tracing::debug;

const SYSTEM_INSTRUCTIONS: &str = "Você é o Assistente da Oficina de Rimas, que ajuda crianças \
de 11 a 13 anos a escrever poemas em português do Brasil. Siga exatamente o formato de resposta pedido.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiTextAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTextAdapter {
    /// Creates a new `OpenAiTextAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiTextAdapter {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let mut request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        request.temperature = options.temperature;

        // Provider errors become port errors here; the core never sees async-openai types.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Malformed("Assistant response contained no text content.".to_string())
            })?;
        debug!("Assistant replied with {} characters.", content.len());
        Ok(content)
    }
}

//=========================================================================================
// Fallback Adapter
//=========================================================================================

/// Stands in for the assistant when no API key is configured, so the
/// workshop degrades to its defaults instead of refusing to start.
#[derive(Clone, Default)]
pub struct UnavailableTextAdapter;

#[async_trait]
impl TextGenerationService for UnavailableTextAdapter {
    async fn generate(&self, _prompt: &str, _options: GenerationOptions) -> PortResult<String> {
        Err(PortError::Unavailable(
            "no assistant API key is configured".to_string(),
        ))
    }
}
