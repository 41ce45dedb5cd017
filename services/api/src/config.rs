//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;
const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Credentials and endpoint for the text generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantCredentials {
    pub api_key: String,
    /// `None` means the provider's default endpoint.
    pub api_base: Option<String>,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    /// Sessions untouched for this long are dropped from memory.
    pub session_idle_timeout: Duration,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub assistant_model: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        let session_idle_minutes = match var("SESSION_IDLE_MINUTES") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "SESSION_IDLE_MINUTES".to_string(),
                        format!("'{}' is not a positive number of minutes", value),
                    )
                })?,
            None => DEFAULT_SESSION_IDLE_MINUTES,
        };
        let session_idle_timeout = Duration::from_secs(session_idle_minutes * 60);

        // --- Assistant Settings (keys are optional) ---
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        let openai_api_key = non_empty("OPENAI_API_KEY");
        let gemini_api_key = non_empty("GEMINI_API_KEY");
        let openai_base_url = non_empty("OPENAI_BASE_URL");
        let assistant_model =
            var("ASSISTANT_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            session_idle_timeout,
            openai_api_key,
            gemini_api_key,
            openai_base_url,
            assistant_model,
        })
    }

    /// Picks the credentials to use: an OpenAI key first, then a Gemini key
    /// through Google's OpenAI-compatible endpoint. `None` means the
    /// assistant is unavailable.
    pub fn assistant_credentials(&self) -> Option<AssistantCredentials> {
        if let Some(key) = &self.openai_api_key {
            return Some(AssistantCredentials {
                api_key: key.clone(),
                api_base: self.openai_base_url.clone(),
            });
        }
        self.gemini_api_key.as_ref().map(|key| AssistantCredentials {
            api_key: key.clone(),
            api_base: Some(
                self.openai_base_url
                    .clone()
                    .unwrap_or_else(|| GEMINI_OPENAI_BASE.to_string()),
            ),
        })
    }
}
