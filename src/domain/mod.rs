//! Domain models: regions, positioned text, the rule table and price-token matching.

pub mod price;
pub mod region;
pub mod rules;
pub mod text;

pub use price::PriceMatcher;
pub use region::{dedup_regions, Expansion, Region, HEADER_BAND_HEIGHT};
pub use rules::{Rule, RuleTable, Term};
pub use text::TextRun;

use regex::Regex;

/// Trait for pattern matching strategies.
pub trait PatternMatcher: Send + Sync {
    fn pattern(&self) -> &Regex;
    fn extract_all<'a>(&self, text: &'a str) -> Vec<&'a str>;
}
