//! Redaction planning for a single page.
//!
//! Stages run in a fixed order: header band, translations, prices,
//! references. Every stage locates against the untouched page; nothing is
//! applied until the whole plan exists.

use super::locator::Locator;
use super::strategy::PageSurface;
use crate::config::ProcessConfig;
use crate::domain::{Region, Rule, RuleTable};
use serde::Serialize;
use tracing::{debug, warn};

/// A planner stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Header,
    Translation,
    Price,
    Reference,
}

/// A cleared translation source and the phrase that belongs there.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub region: Region,
    pub text: String,
}

/// A rule that failed on this page and was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRule {
    pub stage: Stage,
    pub rule: String,
    pub reason: String,
}

/// Everything planned for one page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PagePlan {
    pub page: usize,
    /// Regions in stage order. Overlaps between stages are kept.
    pub regions: Vec<Region>,
    pub header_bands: usize,
    pub translations: usize,
    pub prices_removed: usize,
    pub references_removed: usize,
    pub placements: Vec<Placement>,
    pub skipped: Vec<SkippedRule>,
}

impl PagePlan {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Builds [`PagePlan`]s from a rule table.
#[derive(Debug, Clone)]
pub struct Planner<'a> {
    rules: &'a RuleTable,
    locator: Locator,
}

impl<'a> Planner<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self {
            rules,
            locator: Locator::new(),
        }
    }

    pub fn plan(&self, page: &dyn PageSurface, config: &ProcessConfig) -> PagePlan {
        let mut plan = PagePlan {
            page: page.number(),
            ..Default::default()
        };

        if config.remove_header {
            plan.regions.push(Region::header_band(&page.bounds()));
            plan.header_bands += 1;
        }

        if config.translate {
            for rule in &self.rules.translations {
                let matched = self.run_rule(page, Stage::Translation, rule, &mut plan);
                if let Some(target) = rule.target() {
                    plan.placements.extend(matched.iter().map(|region| Placement {
                        region: *region,
                        text: target.to_string(),
                    }));
                }
                plan.translations += matched.len();
            }
        }

        if config.remove_prices {
            for rule in &self.rules.prices {
                let matched = self.run_rule(page, Stage::Price, rule, &mut plan);
                plan.prices_removed += matched.len();
            }
        }

        if config.remove_reference {
            for rule in &self.rules.references {
                let matched = self.run_rule(page, Stage::Reference, rule, &mut plan);
                plan.references_removed += matched.len();
            }
        }

        debug!(
            page = plan.page,
            regions = plan.regions.len(),
            translations = plan.translations,
            prices = plan.prices_removed,
            references = plan.references_removed,
            "planned page"
        );
        plan
    }

    /// Locates one rule and appends its expanded regions to the plan.
    ///
    /// Returns the located (unexpanded) regions. A failing rule contributes
    /// nothing and is recorded in [`PagePlan::skipped`].
    fn run_rule(
        &self,
        page: &dyn PageSurface,
        stage: Stage,
        rule: &Rule,
        plan: &mut PagePlan,
    ) -> Vec<Region> {
        match self.locator.locate(page, rule.term()) {
            Ok(located) => {
                let expansion = rule.expansion();
                plan.regions.extend(located.iter().map(|r| r.expand(expansion)));
                located
            }
            Err(e) => {
                warn!(page = plan.page, ?stage, rule = %rule.label(), error = %e, "rule skipped");
                plan.skipped.push(SkippedRule {
                    stage,
                    rule: rule.label(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expansion, HEADER_BAND_HEIGHT};
    use crate::redaction::testing::FakePage;

    fn only(f: impl FnOnce(&mut ProcessConfig)) -> ProcessConfig {
        let mut config = ProcessConfig::none();
        f(&mut config);
        config
    }

    #[test]
    fn test_header_band_is_unconditional() {
        let rules = RuleTable::standard();
        let planner = Planner::new(&rules);
        let empty_page = FakePage::new(1);

        let plan = planner.plan(&empty_page, &only(|c| c.remove_header = true));
        assert_eq!(plan.header_bands, 1);
        assert_eq!(
            plan.regions,
            vec![Region::new(0.0, 0.0, 595.0, HEADER_BAND_HEIGHT)]
        );
    }

    #[test]
    fn test_all_stages_disabled_plans_nothing() {
        let rules = RuleTable::standard();
        let page = FakePage::new(1)
            .line("Klamka okienna", 72.0, 200.0)
            .line("Prezzo: 1.234,56 PLN", 72.0, 240.0)
            .line("Nr ref. 99-123", 72.0, 280.0);

        let plan = Planner::new(&rules).plan(&page, &ProcessConfig::none());
        assert!(plan.is_empty());
        assert_eq!(plan.translations, 0);
        assert_eq!(plan.prices_removed, 0);
    }

    #[test]
    fn test_translation_counts_matches() {
        let rules = RuleTable::standard();
        let page = FakePage::new(2).line("Klamka okienna", 72.0, 300.0);

        let plan = Planner::new(&rules).plan(&page, &only(|c| c.translate = true));
        assert_eq!(plan.translations, 1);
        assert_eq!(plan.regions.len(), 1);
        assert_eq!(plan.placements[0].text, "Maniglia per finestra");
        assert_eq!(plan.placements[0].region, plan.regions[0]);
    }

    #[test]
    fn test_price_keyword_is_expanded() {
        let rules = RuleTable::empty().with_price_rule(Rule::removal("Prezzo", Expansion::PRICE));
        let page = FakePage::new(1).line("Prezzo: 1.234,56 PLN", 72.0, 300.0);

        let plan = Planner::new(&rules).plan(&page, &only(|c| c.remove_prices = true));
        assert_eq!(plan.prices_removed, 1);

        let located = Region::new(72.0, 300.0, 72.0 + 6.0 * 6.0, 312.0);
        assert_eq!(plan.regions, vec![located.expand(Expansion::PRICE)]);
        assert!(plan.regions[0].x0 < 72.0);
        // Covers the amount and currency after the keyword.
        assert!(plan.regions[0].x1 > 72.0 + 20.0 * 6.0);
    }

    #[test]
    fn test_standard_price_stage_counts_keyword_and_tokens() {
        let rules = RuleTable::standard();
        let page = FakePage::new(1).line("Prezzo: 1.234,56 PLN", 72.0, 300.0);

        let plan = Planner::new(&rules).plan(&page, &only(|c| c.remove_prices = true));
        // keyword + amount + currency marker
        assert_eq!(plan.prices_removed, 3);
        assert_eq!(plan.translations, 0);
    }

    #[test]
    fn test_reference_marker_expansion() {
        let rules = RuleTable::standard();
        let page = FakePage::new(1).line("Rif. AB-778", 100.0, 400.0);

        let plan = Planner::new(&rules).plan(&page, &only(|c| c.remove_reference = true));
        assert_eq!(plan.references_removed, 1);
        let region = plan.regions[0];
        assert_eq!(region.x0, 100.0 - Expansion::REFERENCE.left);
        assert_eq!(region.x1, 100.0 + 4.0 * 6.0 + Expansion::REFERENCE.right);
    }

    #[test]
    fn test_bad_rule_does_not_lose_other_rules() {
        let rules = RuleTable::empty()
            .with_price_rule(Rule::pattern("([", Expansion::PRICE))
            .with_price_rule(Rule::removal("Cena", Expansion::PRICE));
        let page = FakePage::new(3).line("Cena 12,00", 72.0, 300.0);

        let plan = Planner::new(&rules).plan(&page, &only(|c| c.remove_prices = true));
        assert_eq!(plan.prices_removed, 1);
        assert_eq!(plan.regions.len(), 1);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].stage, Stage::Price);
    }

    #[test]
    fn test_stage_order_and_overlaps_are_kept() {
        let rules = RuleTable::standard();
        // Sits inside the header band and is also a translation source.
        let page = FakePage::new(1).line("Zawias", 72.0, 20.0);

        let plan = Planner::new(&rules).plan(&page, &ProcessConfig::default());
        assert_eq!(plan.regions.len(), 2);
        assert_eq!(plan.regions[0], Region::header_band(&page.bounds()));
        assert!(plan.regions[0].intersects(&plan.regions[1]));
        assert_eq!(plan.translations, 1);
    }

    #[test]
    fn test_unreadable_page_still_gets_header() {
        let rules = RuleTable::standard();
        let page = FakePage::new(1).line("Zawias", 72.0, 300.0).failing_text();

        let plan = Planner::new(&rules).plan(&page, &ProcessConfig::default());
        assert_eq!(plan.header_bands, 1);
        assert_eq!(plan.regions.len(), 1);
        assert_eq!(plan.translations, 0);
        let rule_count = rules.translations.len() + rules.prices.len() + rules.references.len();
        assert_eq!(plan.skipped.len(), rule_count);
    }

    #[test]
    fn test_mixed_casing_counts_one_translation() {
        let rules = RuleTable::standard();
        let page = FakePage::new(1)
            .line("Zawias", 72.0, 300.0)
            .line("ZAWIAS", 72.0, 340.0);

        let plan = Planner::new(&rules).plan(&page, &only(|c| c.translate = true));
        assert_eq!(plan.translations, 1);
        assert_eq!(plan.regions.len(), 1);
        assert_eq!(plan.regions[0].y0, 300.0);
    }
}
