//! The page-content transformation pipeline.
//!
//! Data flows strictly downward:
//! [`ProcessPipeline`] → [`Planner`] (with [`Locator`] and the rule table)
//! → [`RedactionApplicator`] → [`StatsAggregator`].

pub mod locator;
pub mod pipeline;
pub mod planner;
pub mod secure;
pub mod stats;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use locator::Locator;
pub use pipeline::{NoReinsertion, ProcessPipeline, Reinsertion};
pub use planner::{PagePlan, Placement, Planner, SkippedRule, Stage};
pub use secure::{extract_text, MupdfBackend, MupdfDocument, MupdfPage};
pub use stats::{RunStats, StatsAggregator};
pub use strategy::{DocumentBackend, PageSurface, RedactionApplicator, ScrubDocument, ScrubPage};
