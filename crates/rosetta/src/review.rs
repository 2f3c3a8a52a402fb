//! Read-only views over a cached listing: per-field usage against App Store
//! limits, and field-level differences from the live listing.

use rosetta_metadata::types::metadata::limits;
use rosetta_metadata::utils::char_count;
use rosetta_metadata::LocaleMetadata;
use serde::Serialize;

/// Character usage of one listing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUsage {
    pub field: &'static str,
    pub chars: usize,
    pub limit: usize,
}

impl FieldUsage {
    pub fn over_limit(&self) -> bool {
        self.chars > self.limit
    }
}

/// A cached locale with its field usage and screenshot count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalePreview {
    pub version: String,
    pub locale: String,
    pub metadata: LocaleMetadata,
    pub usage: Vec<FieldUsage>,
    pub screenshots: usize,
}

/// Usage of every listing field, in cache order.
pub fn field_usage(metadata: &LocaleMetadata) -> Vec<FieldUsage> {
    metadata
        .fields()
        .into_iter()
        .map(|(field, value)| FieldUsage {
            field,
            chars: char_count(value),
            limit: field_limit(field),
        })
        .collect()
}

fn field_limit(field: &str) -> usize {
    match field {
        "name" => limits::NAME_MAX,
        "subtitle" => limits::SUBTITLE_MAX,
        "keywords" => limits::KEYWORDS_MAX,
        "whatsNew" => limits::WHATS_NEW_MAX,
        _ => limits::DESCRIPTION_MAX,
    }
}

/// How a cached field differs from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Empty live, set locally.
    Added,
    /// Set live, empty locally.
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub kind: ChangeKind,
}

/// Differences for one cached locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleDiff {
    pub locale: String,
    /// The locale has no live listing yet.
    pub new_locale: bool,
    pub changes: Vec<FieldChange>,
}

impl LocaleDiff {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Compares a cached locale with its live counterpart, field by field.
///
/// A missing `remote` is treated as an empty listing.
pub fn diff_locale(locale: &str, local: &LocaleMetadata, remote: Option<&LocaleMetadata>) -> LocaleDiff {
    let empty = LocaleMetadata::default();
    let remote_fields = remote.unwrap_or(&empty).fields();

    let changes = local
        .fields()
        .into_iter()
        .zip(remote_fields)
        .filter_map(|((field, ours), (_, theirs))| {
            let kind = match (ours.trim().is_empty(), theirs.trim().is_empty()) {
                (false, true) => ChangeKind::Added,
                (true, false) => ChangeKind::Removed,
                _ if ours != theirs => ChangeKind::Modified,
                _ => return None,
            };
            Some(FieldChange { field, kind })
        })
        .collect();

    LocaleDiff {
        locale: locale.to_string(),
        new_locale: remote.is_none(),
        changes,
    }
}
