//! services/api/src/error.rs
//!
//! Defines the error type returned by the `api` binary at startup. Request
//! handlers report their own failures as `(StatusCode, String)`.

use crate::config::ConfigError;
use axum::http::header::InvalidHeaderValue;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `CORS_ORIGIN` is not usable as an `Access-Control-Allow-Origin` value.
    #[error("Invalid CORS origin: {0}")]
    CorsOrigin(#[from] InvalidHeaderValue),

    /// Binding the listener or serving connections failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
