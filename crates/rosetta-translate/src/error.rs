//! Error types for translation.

use thiserror::Error;

/// Errors a live translation request can produce.
///
/// These never leave [`crate::Translator`]'s public operations, which fall
/// back to mock or original text instead; they are visible to custom
/// [`crate::ChatBackend`] implementations and in logs.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Request could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The model returned no text.
    #[error("No translation received from the model")]
    EmptyResponse,

    /// Response could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend misconfiguration.
    #[error("Configuration error: {0}")]
    Config(String),
}
