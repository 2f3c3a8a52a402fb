//! Token and cost approximation.
//!
//! Four characters count as one token. Prices are per thousand tokens.

use crate::types::{BatchTranslationRequest, CostEstimate, TokenUsage};

/// Approximate token count of `text`.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

/// Per-thousand-token prices in US dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl Pricing {
    /// gpt-4o-mini list prices.
    pub const GPT_4O_MINI: Pricing = Pricing {
        input_per_1k: 0.00015,
        output_per_1k: 0.0006,
    };

    /// Cost of a token tally.
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        (usage.input as f64 / 1000.0) * self.input_per_1k
            + (usage.output as f64 / 1000.0) * self.output_per_1k
    }

    /// Pre-flight estimate for a batch without calling the model.
    ///
    /// Every string value counts twice, once as input and once as an output
    /// of the same length, for each target locale other than the source.
    /// The total is priced half at the input rate and half at the output rate.
    pub fn estimate(&self, request: &BatchTranslationRequest) -> CostEstimate {
        let per_locale: u64 = request.texts().map(|text| 2 * estimate_tokens(text)).sum();
        let token_estimate = per_locale * request.foreign_targets().count() as u64;

        let half = token_estimate as f64 * 0.5 / 1000.0;
        CostEstimate {
            estimated_cost: half * self.input_per_1k + half * self.output_per_1k,
            token_estimate,
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::GPT_4O_MINI
    }
}

impl TokenUsage {
    /// Adds one translated string to the tally.
    pub fn record(&mut self, source: &str, translated: &str) {
        self.input += estimate_tokens(source);
        self.output += estimate_tokens(translated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_cost_of_usage() {
        let usage = TokenUsage {
            input: 1000,
            output: 2000,
        };
        assert!(close(Pricing::GPT_4O_MINI.cost(&usage), 0.00015 + 0.0012));
    }

    #[test]
    fn test_estimate_skips_source_locale_and_non_strings() {
        let mut request = BatchTranslationRequest::from_fields(
            [("name", "abcdefgh"), ("keywords", "abc")],
            "en-US",
            vec!["en-US".to_string(), "fr-FR".to_string(), "de-DE".to_string()],
        );
        request
            .metadata
            .insert("rating".to_string(), serde_json::json!(5));

        let estimate = Pricing::default().estimate(&request);
        // (2*2 + 2*1) tokens per locale, two foreign locales
        assert_eq!(estimate.token_estimate, 12);
        let expected = (6.0 / 1000.0) * 0.00015 + (6.0 / 1000.0) * 0.0006;
        assert!(close(estimate.estimated_cost, expected));
    }

    #[test]
    fn test_estimate_for_source_only_is_zero() {
        let request = BatchTranslationRequest::from_fields(
            [("name", "JustTime")],
            "en-US",
            vec!["en-US".to_string()],
        );
        assert_eq!(Pricing::default().estimate(&request), CostEstimate::default());
    }
}
