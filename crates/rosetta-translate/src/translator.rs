//! Single-string and batch translation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rosetta_core::config::AiConfig;
use rosetta_core::Outcome;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::{ChatBackend, ChatRequest};
use crate::cost::Pricing;
use crate::mock::{mock_translation, MOCK_WARNING};
use crate::prompt::build_translation_prompt;
use crate::types::{
    BatchTranslationRequest, BatchTranslationResult, CostEstimate, TokenUsage, TranslationRequest,
    TranslationResult,
};
use crate::Result;

/// Confidence reported for model output.
pub const LIVE_CONFIDENCE: f64 = 0.95;

/// Pause after each live call in a batch, to stay under rate limits.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_millis(100);

/// Where translations come from.
#[derive(Clone)]
pub enum TranslateMode {
    Live(Arc<dyn ChatBackend>),
    Mock,
}

impl TranslateMode {
    pub fn live(backend: impl ChatBackend + 'static) -> Self {
        Self::Live(Arc::new(backend))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

impl fmt::Debug for TranslateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live(_) => f.write_str("Live"),
            Self::Mock => f.write_str("Mock"),
        }
    }
}

/// Translates listing text with a chat model, or from the mock tables.
#[derive(Debug, Clone)]
pub struct Translator {
    mode: TranslateMode,
    model: String,
    temperature: f32,
    max_tokens: u32,
    pricing: Pricing,
    call_delay: Duration,
}

impl Translator {
    pub fn new(mode: TranslateMode, ai: &AiConfig) -> Self {
        Self {
            mode,
            model: ai.model.clone(),
            temperature: ai.temperature,
            max_tokens: ai.max_tokens,
            pricing: Pricing::default(),
            call_delay: DEFAULT_CALL_DELAY,
        }
    }

    /// Overrides the pause between live calls.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    pub fn mode(&self) -> &TranslateMode {
        &self.mode
    }

    pub fn is_live(&self) -> bool {
        self.mode.is_live()
    }

    /// Translates one string.
    ///
    /// A failed live call falls back to the mock translation, whose warning
    /// is carried in the result.
    pub async fn translate_text(&self, request: &TranslationRequest) -> TranslationResult {
        let backend = match &self.mode {
            TranslateMode::Mock => return mock_translation(request),
            TranslateMode::Live(backend) => backend,
        };

        match self.complete(backend.as_ref(), request).await {
            Ok(translated_text) => TranslationResult {
                translated_text,
                confidence: LIVE_CONFIDENCE,
                warnings: Vec::new(),
            },
            Err(e) => {
                warn!(
                    source = %request.source_locale,
                    target = %request.target_locale,
                    error = %e,
                    "Translation failed, using mock translation"
                );
                mock_translation(request)
            }
        }
    }

    /// Translates every string field into every target locale.
    ///
    /// The source locale gets a verbatim copy. Non-string and blank values
    /// pass through unchanged. In mock mode the whole result is degraded; in
    /// live mode a field whose call fails keeps its original text and the
    /// result is degraded with the failures listed.
    pub async fn translate_metadata(
        &self,
        request: &BatchTranslationRequest,
    ) -> Outcome<BatchTranslationResult> {
        let mut result = BatchTranslationResult::default();
        let mut usage = TokenUsage::default();
        let mut failures = Vec::new();

        for locale in &request.target_locales {
            if *locale == request.source_locale {
                result
                    .translations
                    .insert(locale.clone(), request.metadata.clone());
                continue;
            }

            let mut fields = indexmap::IndexMap::with_capacity(request.metadata.len());
            for (field, value) in &request.metadata {
                let text = match value.as_str() {
                    Some(text) if !text.trim().is_empty() => text,
                    _ => {
                        fields.insert(field.clone(), value.clone());
                        continue;
                    }
                };

                let single = TranslationRequest::new(text, &request.source_locale, locale)
                    .with_field(field.as_str())
                    .with_context(request.context.clone());

                let translated = match &self.mode {
                    TranslateMode::Mock => Some(mock_translation(&single).translated_text),
                    TranslateMode::Live(backend) => {
                        let reply = self.complete(backend.as_ref(), &single).await;
                        tokio::time::sleep(self.call_delay).await;
                        match reply {
                            Ok(text) => Some(text),
                            Err(e) => {
                                warn!(field = %field, locale = %locale, error = %e, "Failed to translate field");
                                failures.push(format!("{} ({}): {}", field, locale, e));
                                None
                            }
                        }
                    }
                };

                match translated {
                    Some(translated) => {
                        usage.record(text, &translated);
                        fields.insert(field.clone(), Value::String(translated));
                    }
                    None => {
                        fields.insert(field.clone(), value.clone());
                    }
                }
            }
            result.translations.insert(locale.clone(), fields);
        }

        result.tokens_used = usage;
        result.total_cost = self.pricing.cost(&usage);
        info!(
            locales = result.translations.len(),
            input_tokens = usage.input,
            output_tokens = usage.output,
            "Translation finished"
        );

        if !self.is_live() {
            Outcome::degraded(result, MOCK_WARNING)
        } else if !failures.is_empty() {
            Outcome::degraded(
                result,
                format!("{} field(s) kept their original text: {}", failures.len(), failures.join("; ")),
            )
        } else {
            Outcome::Ok(result)
        }
    }

    /// Pre-flight cost estimate. Never calls the model.
    pub fn estimate_cost(&self, request: &BatchTranslationRequest) -> CostEstimate {
        self.pricing.estimate(request)
    }

    async fn complete(&self, backend: &dyn ChatBackend, request: &TranslationRequest) -> Result<String> {
        let chat = ChatRequest {
            model: self.model.clone(),
            prompt: build_translation_prompt(request),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        debug!(
            field = request.field.as_deref().unwrap_or("-"),
            target = %request.target_locale,
            "Translating"
        );
        backend.complete(&chat).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TranslateError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers `<locale-tag>:<n>` and fails any prompt containing `fail_on`.
    struct FakeChat {
        fail_on: Option<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeChat {
        fn new(fail_on: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                fail_on,
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for FakeChat {
        async fn complete(&self, request: &ChatRequest) -> Result<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.prompt.clone());
            if let Some(marker) = self.fail_on {
                if request.prompt.contains(marker) {
                    return Err(TranslateError::Api {
                        status: 500,
                        message: "boom".to_string(),
                    });
                }
            }
            Ok(format!("translated-{}", prompts.len()))
        }
    }

    fn live(fake: &Arc<FakeChat>) -> Translator {
        let backend: Arc<dyn ChatBackend> = fake.clone();
        Translator::new(TranslateMode::Live(backend), &AiConfig::default())
            .with_call_delay(Duration::ZERO)
    }

    fn mock() -> Translator {
        Translator::new(TranslateMode::Mock, &AiConfig::default())
    }

    #[tokio::test]
    async fn test_mock_text_from_table() {
        let result = mock()
            .translate_text(&TranslationRequest::new(
                "Bug fixes and performance improvements.",
                "en-US",
                "zh-Hans",
            ))
            .await;
        assert_eq!(result.translated_text, "修复错误并提升性能。");
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.warnings, vec![MOCK_WARNING]);
    }

    #[tokio::test]
    async fn test_mock_text_without_entry() {
        let result = mock()
            .translate_text(&TranslationRequest::new("Track every minute", "en-US", "it"))
            .await;
        assert_eq!(result.translated_text, "[MOCK] Track every minute");
    }

    #[tokio::test]
    async fn test_live_text_uses_model_settings() {
        let fake = FakeChat::new(None);
        let result = live(&fake)
            .translate_text(&TranslationRequest::new("Hello", "en-US", "fr-FR").with_field("name"))
            .await;

        assert_eq!(result.translated_text, "translated-1");
        assert_eq!(result.confidence, LIVE_CONFIDENCE);
        assert!(result.warnings.is_empty());
        assert!(fake.prompts()[0].contains("English text to French"));
        assert!(fake.prompts()[0].contains("Field-specific guidance for \"name\""));
    }

    #[tokio::test]
    async fn test_live_text_failure_falls_back_to_mock() {
        let fake = FakeChat::new(Some("JustTime"));
        let result = live(&fake)
            .translate_text(&TranslationRequest::new("JustTime", "en-US", "zh-Hans"))
            .await;
        assert_eq!(result.translated_text, "时间追踪");
        assert_eq!(result.warnings, vec![MOCK_WARNING]);
    }

    #[tokio::test]
    async fn test_batch_mock_is_degraded() {
        let request = BatchTranslationRequest::from_fields(
            [("name", "JustTime"), ("whatsNew", "Bug fixes and performance improvements.")],
            "en-US",
            vec!["en-US".to_string(), "de-DE".to_string()],
        );
        let outcome = mock().translate_metadata(&request).await;

        assert_eq!(outcome.reason(), Some(MOCK_WARNING));
        let result = outcome.into_value().unwrap();
        assert_eq!(result.text("en-US", "name"), Some("JustTime"));
        assert_eq!(
            result.text("de-DE", "whatsNew"),
            Some("Fehlerbehebungen und Leistungsverbesserungen.")
        );
        assert!(result.tokens_used.input > 0);
    }

    #[tokio::test]
    async fn test_batch_live_copies_source_and_passes_through_non_strings() {
        let fake = FakeChat::new(None);
        let mut request = BatchTranslationRequest::from_fields(
            [("name", "JustTime"), ("subtitle", "  ")],
            "en-US",
            vec!["en-US".to_string(), "fr-FR".to_string()],
        );
        request.metadata.insert("rating".to_string(), json!(4));

        let outcome = live(&fake).translate_metadata(&request).await;
        assert!(outcome.is_ok());
        let result = outcome.into_value().unwrap();

        assert_eq!(result.translations["en-US"], request.metadata);
        assert_eq!(result.text("fr-FR", "name"), Some("translated-1"));
        assert_eq!(result.text("fr-FR", "subtitle"), Some("  "));
        assert_eq!(result.translations["fr-FR"]["rating"], json!(4));
        // only one non-blank string for one foreign locale
        assert_eq!(fake.prompts().len(), 1);
        assert_eq!(result.tokens_used, TokenUsage { input: 2, output: 3 });
        assert!(result.total_cost > 0.0);
    }

    #[tokio::test]
    async fn test_batch_live_field_failure_keeps_original() {
        let fake = FakeChat::new(Some("Some keywords"));
        let request = BatchTranslationRequest::from_fields(
            [("name", "JustTime"), ("keywords", "Some keywords")],
            "en-US",
            vec!["ja".to_string()],
        );

        let outcome = live(&fake).translate_metadata(&request).await;
        assert!(outcome.is_degraded());
        assert!(outcome.reason().unwrap().contains("keywords (ja)"));

        let result = outcome.into_value().unwrap();
        assert_eq!(result.text("ja", "name"), Some("translated-1"));
        assert_eq!(result.text("ja", "keywords"), Some("Some keywords"));
    }

    #[test]
    fn test_estimate_cost_uses_pricing() {
        let request = BatchTranslationRequest::from_fields(
            [("name", "abcd")],
            "en-US",
            vec!["fr-FR".to_string()],
        );
        assert_eq!(mock().estimate_cost(&request).token_estimate, 2);
    }
}
