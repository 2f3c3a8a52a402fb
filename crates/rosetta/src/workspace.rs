//! Conversions between cached listings and translation batches.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rosetta_metadata::cache::SCREENSHOTS_DIR_NAME;
use rosetta_metadata::LocaleMetadata;
use rosetta_translate::BatchTranslationRequest;
use serde_json::Value;
use tokio::fs;

use crate::Result;

/// Builds a batch request from a cached source locale.
///
/// Every field is included, empty ones too, so the translated map keeps the
/// full shape of a listing.
pub fn batch_request(
    source: &LocaleMetadata,
    source_locale: &str,
    target_locales: Vec<String>,
) -> BatchTranslationRequest {
    BatchTranslationRequest::from_fields(source.fields(), source_locale, target_locales)
}

/// Reads a translated field map back into a listing.
pub fn locale_from_fields(fields: &IndexMap<String, Value>) -> Result<LocaleMetadata> {
    Ok(serde_json::from_value(serde_json::to_value(fields)?)?)
}

/// Screenshot files under `<locale_dir>/screenshots/<display_type>/`,
/// sorted by path.
pub async fn cached_screenshots(locale_dir: &Path) -> Result<Vec<PathBuf>> {
    let root = locale_dir.join(SCREENSHOTS_DIR_NAME);
    let mut files = Vec::new();

    let mut sets = match fs::read_dir(&root).await {
        Ok(sets) => sets,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(e.into()),
    };

    while let Some(set) = sets.next_entry().await? {
        if !set.file_type().await?.is_dir() {
            continue;
        }
        let mut entries = fs::read_dir(set.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }
    }

    files.sort();
    Ok(files)
}
