//! Run statistics.

use super::planner::PagePlan;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Statistics about one pipeline run, rendered verbatim by the service layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Pages processed
    pub pages: usize,

    /// Translation source phrases redacted
    pub translations: usize,

    /// Price keyword and price token matches redacted
    pub prices_removed: usize,

    /// Wall-clock seconds from open to save
    pub processing_time: f64,

    /// Size in bytes of the saved document
    pub output_size: u64,
}

impl RunStats {
    /// Returns true if any counted content was redacted.
    pub fn has_redactions(&self) -> bool {
        self.translations > 0 || self.prices_removed > 0
    }
}

/// Running counters for a single run.
///
/// Counters only ever grow; [`StatsAggregator::finish`] freezes them into
/// a [`RunStats`].
#[derive(Debug)]
pub struct StatsAggregator {
    started: Instant,
    pages: usize,
    translations: usize,
    prices_removed: usize,
    references_removed: usize,
    regions_applied: usize,
    rules_skipped: usize,
}

impl StatsAggregator {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            pages: 0,
            translations: 0,
            prices_removed: 0,
            references_removed: 0,
            regions_applied: 0,
            rules_skipped: 0,
        }
    }

    /// Adds one processed page.
    pub fn record_page(&mut self, plan: &PagePlan, applied: usize) {
        self.pages += 1;
        self.translations += plan.translations;
        self.prices_removed += plan.prices_removed;
        self.references_removed += plan.references_removed;
        self.regions_applied += applied;
        self.rules_skipped += plan.skipped.len();
    }

    pub fn regions_applied(&self) -> usize {
        self.regions_applied
    }

    pub fn references_removed(&self) -> usize {
        self.references_removed
    }

    pub fn rules_skipped(&self) -> usize {
        self.rules_skipped
    }

    /// Snapshot of the counters so far, without timing or size.
    pub fn snapshot(&self) -> RunStats {
        RunStats {
            pages: self.pages,
            translations: self.translations,
            prices_removed: self.prices_removed,
            ..Default::default()
        }
    }

    pub fn finish(self, output_size: u64) -> RunStats {
        RunStats {
            processing_time: self.started.elapsed().as_secs_f64(),
            output_size,
            ..self.snapshot()
        }
    }
}
