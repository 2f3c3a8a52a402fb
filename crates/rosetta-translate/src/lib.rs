//! Translation of App Store listing text for Rosetta.
//!
//! A [`Translator`] sends each listing field through a chat-completion model
//! with a prompt tailored to the field and the target language. Without an
//! API key it answers from small built-in tables instead, so the rest of the
//! toolkit keeps working offline.
//!
//! ## Example
//!
//! ```rust
//! use rosetta_translate::{TranslateMode, TranslationRequest, Translator};
//! use rosetta_core::config::AiConfig;
//!
//! # async fn example() {
//! let translator = Translator::new(TranslateMode::Mock, &AiConfig::default());
//! let result = translator
//!     .translate_text(&TranslationRequest::new(
//!         "Bug fixes and performance improvements.",
//!         "en-US",
//!         "zh-Hans",
//!     ))
//!     .await;
//! assert_eq!(result.translated_text, "修复错误并提升性能。");
//! # }
//! ```

pub mod backend;
pub mod cost;
pub mod error;
pub mod locales;
pub mod mock;
pub mod prompt;
pub mod translator;
pub mod types;

pub use backend::{ChatBackend, ChatRequest, OpenAiClient};
pub use cost::{estimate_tokens, Pricing};
pub use error::TranslateError;
pub use translator::{TranslateMode, Translator};
pub use types::{
    BatchTranslationRequest, BatchTranslationResult, CostEstimate, TokenUsage,
    TranslationRequest, TranslationResult,
};

/// Result type alias for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;
