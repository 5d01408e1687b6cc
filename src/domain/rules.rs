//! The rule table: what gets located and how far each match is grown.
//!
//! The standard table targets Polish supplier documents being prepared for
//! Italian customers: product phrases are cleared for translation, prices and
//! currency markers are blanked, and supplier reference codes are removed.

use super::price::PriceMatcher;
use super::region::Expansion;

/// A search term handed to the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term<'a> {
    /// Exact, case-sensitive text.
    Literal(&'a str),
    /// Regular expression evaluated against the page text.
    Pattern(&'a str),
}

/// A single content rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Source phrase is redacted. The target phrase is carried along for
    /// reinsertion but not drawn by default.
    LiteralTranslation { source: String, target: String },

    /// Literal text redacted with the given expansion.
    LiteralRemoval { text: String, expansion: Expansion },

    /// Pattern whose matches are redacted with the given expansion.
    PatternRemoval { pattern: String, expansion: Expansion },
}

impl Rule {
    pub fn translation(source: &str, target: &str) -> Self {
        Self::LiteralTranslation {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    pub fn removal(text: &str, expansion: Expansion) -> Self {
        Self::LiteralRemoval {
            text: text.to_string(),
            expansion,
        }
    }

    pub fn pattern(pattern: &str, expansion: Expansion) -> Self {
        Self::PatternRemoval {
            pattern: pattern.to_string(),
            expansion,
        }
    }

    pub fn term(&self) -> Term<'_> {
        match self {
            Self::LiteralTranslation { source, .. } => Term::Literal(source),
            Self::LiteralRemoval { text, .. } => Term::Literal(text),
            Self::PatternRemoval { pattern, .. } => Term::Pattern(pattern),
        }
    }

    pub fn expansion(&self) -> Expansion {
        match self {
            Self::LiteralTranslation { .. } => Expansion::NONE,
            Self::LiteralRemoval { expansion, .. } | Self::PatternRemoval { expansion, .. } => {
                *expansion
            }
        }
    }

    /// Replacement text, for translation rules.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::LiteralTranslation { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Short human-readable label used in logs and stage errors.
    pub fn label(&self) -> String {
        match self {
            Self::LiteralTranslation { source, .. } => format!("translate '{}'", source),
            Self::LiteralRemoval { text, .. } => format!("remove '{}'", text),
            Self::PatternRemoval { pattern, .. } => format!("pattern /{}/", pattern),
        }
    }
}

/// Polish → Italian product vocabulary.
const TRANSLATIONS: &[(&str, &str)] = &[
    ("Klamka okienna", "Maniglia per finestra"),
    ("Okno uchylne", "Finestra a ribalta"),
    ("Okno rozwierne", "Finestra a battente"),
    ("Drzwi balkonowe", "Porta finestra"),
    ("Parapet wewnętrzny", "Davanzale interno"),
    ("Parapet zewnętrzny", "Davanzale esterno"),
    ("Szyba zespolona", "Vetrocamera"),
    ("Uszczelka", "Guarnizione"),
    ("Zawias", "Cerniera"),
    ("Moskitiera", "Zanzariera"),
    ("Roleta zewnętrzna", "Tapparella esterna"),
    ("Kolor", "Colore"),
    ("Wymiary", "Dimensioni"),
    ("Ilość", "Quantità"),
];

/// Keywords that open a price line or cell.
const PRICE_KEYWORDS: &[&str] = &["Prezzo", "Cena", "Wartość", "Razem", "Price"];

/// Markers that precede a supplier reference value.
const REFERENCE_MARKERS: &[&str] = &["Nr ref.", "Rif.", "Indeks:", "Kod produktu"];

/// Static rule groups, one per planner stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    pub translations: Vec<Rule>,
    pub prices: Vec<Rule>,
    pub references: Vec<Rule>,
}

impl RuleTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            translations: Vec::new(),
            prices: Vec::new(),
            references: Vec::new(),
        }
    }

    /// The built-in dictionary, price keywords, price grammar and reference markers.
    pub fn standard() -> Self {
        let translations = TRANSLATIONS
            .iter()
            .map(|(source, target)| Rule::translation(source, target))
            .collect();

        let prices = PRICE_KEYWORDS
            .iter()
            .map(|keyword| Rule::removal(keyword, Expansion::PRICE))
            .chain(
                PriceMatcher::sources()
                    .into_iter()
                    .map(|source| Rule::pattern(source, Expansion::PRICE)),
            )
            .collect();

        let references = REFERENCE_MARKERS
            .iter()
            .map(|marker| Rule::removal(marker, Expansion::REFERENCE))
            .collect();

        Self {
            translations,
            prices,
            references,
        }
    }

    pub fn with_translation(mut self, source: &str, target: &str) -> Self {
        self.translations.push(Rule::translation(source, target));
        self
    }

    pub fn with_price_rule(mut self, rule: Rule) -> Self {
        self.prices.push(rule);
        self
    }

    pub fn with_reference(mut self, marker: &str) -> Self {
        self.references.push(Rule::removal(marker, Expansion::REFERENCE));
        self
    }

    /// Looks up the target phrase for a source phrase.
    pub fn translate(&self, source: &str) -> Option<&str> {
        self.translations.iter().find_map(|rule| match rule {
            Rule::LiteralTranslation { source: s, target } if s == source => Some(target.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.translations.len() + self.prices.len() + self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}
