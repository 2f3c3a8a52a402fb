//! Error types for cache-backed workflows

use rosetta_metadata::MetadataError;
use thiserror::Error;

/// Result type alias using RosettaError
pub type Result<T> = std::result::Result<T, RosettaError>;

/// Errors from workflows that read or write the local cache
#[derive(Debug, Error)]
pub enum RosettaError {
    /// Nothing has been pulled for this app yet
    #[error("No cached listing for {0}. Run `rosetta pull` first.")]
    NotCached(String),

    /// Cache or store failure
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Local file access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A translated field map could not be turned back into a listing
    #[error("Invalid translation payload: {0}")]
    Serialization(#[from] serde_json::Error),
}
