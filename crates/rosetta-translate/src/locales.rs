//! Language names used in prompts.

/// Locale codes with a known display name.
pub const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("en-US", "English"),
    ("zh-Hans", "Simplified Chinese"),
    ("zh-Hant", "Traditional Chinese"),
    ("fr-FR", "French"),
    ("de-DE", "German"),
    ("ja-JP", "Japanese"),
    ("ko-KR", "Korean"),
    ("es-ES", "Spanish"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("it-IT", "Italian"),
    ("ru-RU", "Russian"),
    ("ar-SA", "Arabic"),
];

/// English name of a locale's language, or the code itself when unknown.
pub fn display_name(locale: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(code, _)| *code == locale)
        .map(|(_, name)| *name)
        .unwrap_or(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_locales() {
        assert_eq!(display_name("zh-Hans"), "Simplified Chinese");
        assert_eq!(display_name("pt-BR"), "Portuguese (Brazil)");
        assert_eq!(display_name("sv-SE"), "sv-SE");
        assert_eq!(DISPLAY_NAMES.len(), 12);
    }
}
