//! Small helpers shared across the crate.

use std::path::{Component, Path};

use chrono::{SecondsFormat, Utc};

/// Current time as an RFC 3339 timestamp with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Length in Unicode scalar values, the unit App Store limits are counted in.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Normalize a locale code to App Store Connect form.
///
/// Underscores become hyphens, the language is lowercased, a four-letter
/// script is title-cased and anything else is treated as a region.
///
/// ```rust
/// use rosetta_metadata::utils::normalize_locale;
///
/// assert_eq!(normalize_locale("en_us"), "en-US");
/// assert_eq!(normalize_locale("zh-hans"), "zh-Hans");
/// assert_eq!(normalize_locale("JA"), "ja");
/// ```
pub fn normalize_locale(locale: &str) -> String {
    let normalized = locale.trim().replace('_', "-");
    let mut parts = normalized.split('-').filter(|p| !p.is_empty());

    let Some(language) = parts.next() else {
        return String::new();
    };
    let mut result = language.to_lowercase();

    if let Some(second) = parts.next() {
        result.push('-');
        if second.len() == 4 {
            let mut chars = second.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.push_str(&chars.as_str().to_lowercase());
            }
        } else {
            result.push_str(&second.to_uppercase());
        }
    }

    result
}

/// `path` relative to `base`, joined with `/` regardless of platform.
///
/// Falls back to the full path when `path` is not under `base`.
pub fn relative_slash_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_char_count_counts_scalars() {
        assert_eq!(char_count("时间追踪"), 4);
        assert_eq!(char_count("abc"), 3);
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("de_de"), "de-DE");
        assert_eq!(normalize_locale("ZH-HANT"), "zh-Hant");
        assert_eq!(normalize_locale("fr-FR"), "fr-FR");
        assert_eq!(normalize_locale(""), "");
    }

    #[test]
    fn test_relative_slash_path() {
        let base = PathBuf::from("/cache/com.example/1.0/en-US");
        let file = base.join("screenshots").join("APP_IPHONE_65").join("01-a.png");
        assert_eq!(
            relative_slash_path(&base, &file),
            "screenshots/APP_IPHONE_65/01-a.png"
        );
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
