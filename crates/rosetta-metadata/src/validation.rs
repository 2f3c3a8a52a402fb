//! Listing content checks.
//!
//! Validation never fails; it reports. Errors make the content invalid,
//! warnings do not.

use serde::{Deserialize, Serialize};

use crate::types::metadata::{limits, LocaleMetadata};
use crate::utils::char_count;

/// Fields to check. Absent or empty fields are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentInput {
    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub whats_new: Option<String>,
}

impl From<&LocaleMetadata> for ContentInput {
    fn from(metadata: &LocaleMetadata) -> Self {
        Self {
            name: Some(metadata.name.clone()),
            subtitle: Some(metadata.subtitle.clone()),
            description: Some(metadata.description.clone()),
            keywords: Some(metadata.keywords.clone()),
            whats_new: Some(metadata.whats_new.clone()),
        }
    }
}

/// Outcome of [`validate_content`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentValidation {
    /// True when `errors` is empty.
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ContentValidation {
    fn from_issues(warnings: Vec<String>, errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            warnings,
            errors,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Checks listing text against App Store character limits.
pub fn validate_content(content: &ContentInput) -> ContentValidation {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    if let Some(name) = present(&content.name) {
        if char_count(name) > limits::NAME_MAX {
            errors.push(format!("Name exceeds {} character limit", limits::NAME_MAX));
        }
    }

    if let Some(subtitle) = present(&content.subtitle) {
        if char_count(subtitle) > limits::SUBTITLE_MAX {
            errors.push(format!(
                "Subtitle exceeds {} character limit",
                limits::SUBTITLE_MAX
            ));
        }
    }

    if let Some(description) = present(&content.description) {
        let count = char_count(description);
        if count > limits::DESCRIPTION_MAX {
            errors.push(format!(
                "Description exceeds {} character limit",
                limits::DESCRIPTION_MAX
            ));
        }
        if count < limits::DESCRIPTION_MIN {
            warnings.push("Description is very short, consider adding more details".to_string());
        }
    }

    if let Some(keywords) = present(&content.keywords) {
        if char_count(keywords) > limits::KEYWORDS_MAX {
            errors.push(format!(
                "Keywords exceed {} character limit",
                limits::KEYWORDS_MAX
            ));
        }
    }

    if let Some(whats_new) = present(&content.whats_new) {
        if char_count(whats_new) > limits::WHATS_NEW_MAX {
            errors.push(format!(
                "What's New exceeds {} character limit",
                limits::WHATS_NEW_MAX
            ));
        }
    }

    ContentValidation::from_issues(warnings, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(text: String) -> ContentInput {
        ContentInput {
            description: Some(text),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_content_is_valid() {
        let result = validate_content(&ContentInput::default());
        assert!(result.valid);
        assert!(result.warnings.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_long_description_is_an_error() {
        let result = validate_content(&description("a".repeat(4001)));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Description exceeds 4000 character limit"]);
    }

    #[test]
    fn test_description_at_limit_is_valid() {
        assert!(validate_content(&description("a".repeat(4000))).valid);
    }

    #[test]
    fn test_short_description_warns() {
        let result = validate_content(&description("Short".to_string()));
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec!["Description is very short, consider adding more details"]
        );
    }

    #[test]
    fn test_limits_count_characters_not_bytes() {
        // 100 CJK characters are 300 bytes
        let content = ContentInput {
            keywords: Some("时".repeat(100)),
            ..Default::default()
        };
        assert!(validate_content(&content).valid);

        let content = ContentInput {
            keywords: Some("时".repeat(101)),
            ..Default::default()
        };
        assert_eq!(
            validate_content(&content).errors,
            vec!["Keywords exceed 100 character limit"]
        );
    }

    #[test]
    fn test_name_and_subtitle_limits() {
        let content = ContentInput {
            name: Some("N".repeat(31)),
            subtitle: Some("S".repeat(31)),
            ..Default::default()
        };
        let result = validate_content(&content);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_from_locale_metadata_skips_empty_fields() {
        let metadata = LocaleMetadata::new("JustTime", "", "", "time,tracking", "");
        let result = validate_content(&ContentInput::from(&metadata));
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }
}
