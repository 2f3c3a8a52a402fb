//! Request and result types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One string to translate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    pub source_locale: String,
    pub target_locale: String,
    /// Free-text hints about the app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Listing field the text belongs to (`name`, `description`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_locale: impl Into<String>,
        target_locale: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_locale: source_locale.into(),
            target_locale: target_locale.into(),
            context: None,
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }
}

/// A translated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    /// 0.95 for model output, 0.8 for mock output.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Listing fields to translate into several locales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTranslationRequest {
    /// Field name to value. Only non-blank strings are translated.
    pub metadata: IndexMap<String, Value>,
    pub source_locale: String,
    pub target_locales: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl BatchTranslationRequest {
    /// Builds a request from `(field, text)` pairs.
    pub fn from_fields<'a>(
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
        source_locale: impl Into<String>,
        target_locales: Vec<String>,
    ) -> Self {
        Self {
            metadata: fields
                .into_iter()
                .map(|(field, text)| (field.to_string(), Value::String(text.to_string())))
                .collect(),
            source_locale: source_locale.into(),
            target_locales,
            context: None,
        }
    }

    /// Target locales other than the source locale.
    pub fn foreign_targets(&self) -> impl Iterator<Item = &String> {
        self.target_locales
            .iter()
            .filter(move |locale| **locale != self.source_locale)
    }

    /// String values of the metadata, in field order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.metadata.values().filter_map(Value::as_str)
    }
}

/// Approximate token counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// Translations per locale, with the approximate cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTranslationResult {
    /// Locale to field to value.
    pub translations: IndexMap<String, IndexMap<String, Value>>,
    /// Approximate cost in US dollars.
    pub total_cost: f64,
    pub tokens_used: TokenUsage,
}

impl BatchTranslationResult {
    /// Translated string of a field, if it is a string.
    pub fn text(&self, locale: &str, field: &str) -> Option<&str> {
        self.translations.get(locale)?.get(field)?.as_str()
    }
}

/// Pre-flight cost estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    /// Approximate cost in US dollars.
    pub estimated_cost: f64,
    /// Input plus output tokens.
    pub token_estimate: u64,
}
