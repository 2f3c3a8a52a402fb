//! Offline translations.
//!
//! A handful of strings from the demo listing have canned translations; any
//! other text comes back prefixed with `[MOCK] `.

use crate::types::{TranslationRequest, TranslationResult};

/// Warning attached to every mock result.
pub const MOCK_WARNING: &str = "Using mock translation (OpenAI not configured)";

/// Confidence reported for mock results.
pub const MOCK_CONFIDENCE: f64 = 0.8;

const ZH_HANS: &[(&str, &str)] = &[
    ("JustTime", "时间追踪"),
    (
        "A simple and elegant time tracking app for productivity.",
        "简洁优雅的时间追踪应用，提升您的工作效率。",
    ),
    ("time,tracking,productivity,work,timer", "时间,追踪,效率,工作,计时器"),
    ("Bug fixes and performance improvements.", "修复错误并提升性能。"),
];

const FR_FR: &[(&str, &str)] = &[
    ("JustTime", "JustTime"),
    (
        "A simple and elegant time tracking app for productivity.",
        "Une application simple et élégante pour le suivi du temps et la productivité.",
    ),
    (
        "time,tracking,productivity,work,timer",
        "temps,suivi,productivité,travail,minuteur",
    ),
    (
        "Bug fixes and performance improvements.",
        "Corrections de bogues et améliorations de performance.",
    ),
];

const DE_DE: &[(&str, &str)] = &[
    ("JustTime", "JustTime"),
    (
        "A simple and elegant time tracking app for productivity.",
        "Eine einfache und elegante Zeiterfassungs-App für mehr Produktivität.",
    ),
    (
        "time,tracking,productivity,work,timer",
        "zeit,erfassung,produktivität,arbeit,timer",
    ),
    (
        "Bug fixes and performance improvements.",
        "Fehlerbehebungen und Leistungsverbesserungen.",
    ),
];

fn table(locale: &str) -> &'static [(&'static str, &'static str)] {
    match locale {
        "zh-Hans" => ZH_HANS,
        "fr-FR" => FR_FR,
        "de-DE" => DE_DE,
        _ => &[],
    }
}

/// Canned translation of `text` into `locale`, matching the text exactly.
pub fn lookup(locale: &str, text: &str) -> Option<&'static str> {
    table(locale)
        .iter()
        .find(|(source, _)| *source == text)
        .map(|(_, translated)| *translated)
}

/// Deterministic offline translation.
pub fn mock_translation(request: &TranslationRequest) -> TranslationResult {
    let translated_text = match lookup(&request.target_locale, &request.text) {
        Some(text) => text.to_string(),
        None => format!("[MOCK] {}", request.text),
    };

    TranslationResult {
        translated_text,
        confidence: MOCK_CONFIDENCE,
        warnings: vec![MOCK_WARNING.to_string()],
    }
}
