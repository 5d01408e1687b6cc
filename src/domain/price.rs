//! Price token grammar.
//!
//! Recognises the three shapes that mark price-bearing text:
//! - monetary amounts with optional thousands separators and a two-digit
//!   fraction (`1.234,56`, `1,234.56`, `99,00`)
//! - currency markers (`PLN`, `zł`, `€`, `EUR`)
//! - integer percentages (`23%`)

use super::PatternMatcher;
use once_cell::sync::Lazy;
use regex::Regex;

/// Amount with optional thousands grouping and a mandatory two-digit fraction.
pub const AMOUNT_PATTERN: &str = r"\b\d{1,3}(?:[.,\u{a0} ]\d{3})*[.,]\d{2}\b";

/// Currency markers used on the source documents.
pub const CURRENCY_PATTERN: &str = r"\bPLN\b|\bEUR\b|zł|€";

/// Whole-number percentages, e.g. VAT rates.
pub const PERCENT_PATTERN: &str = r"\b\d{1,3}\s?%";

/// Matcher for any price-bearing token.
#[derive(Debug, Clone, Default)]
pub struct PriceMatcher;

impl PriceMatcher {
    pub fn new() -> Self {
        Self
    }

    /// The individual grammars, in the order the price stage runs them.
    pub fn sources() -> [&'static str; 3] {
        [AMOUNT_PATTERN, CURRENCY_PATTERN, PERCENT_PATTERN]
    }

    fn regex() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(
                "(?:{})|(?:{})|(?:{})",
                AMOUNT_PATTERN, CURRENCY_PATTERN, PERCENT_PATTERN
            ))
            .expect("Valid price regex")
        });
        &PATTERN
    }
}

impl PatternMatcher for PriceMatcher {
    fn pattern(&self) -> &Regex {
        Self::regex()
    }

    fn extract_all<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern().find_iter(text).map(|m| m.as_str()).collect()
    }
}
