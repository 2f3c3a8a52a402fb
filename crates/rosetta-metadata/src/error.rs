//! Error types for metadata operations.

use thiserror::Error;

/// Errors that can occur during metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid format encountered.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// App Store Connect returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request could not be completed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication token could not be produced.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A file download returned a non-success status.
    #[error("HTTP {status} for {url}")]
    Download { url: String, status: u16 },

    /// Sync operation failed.
    #[error("Sync error: {0}")]
    SyncError(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        MetadataError::SerializationError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for MetadataError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        MetadataError::Auth(err.to_string())
    }
}
