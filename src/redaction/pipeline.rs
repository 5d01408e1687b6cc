//! The process pipeline: open, plan and apply every page, save.

use super::planner::{Placement, Planner};
use super::secure::MupdfBackend;
use super::stats::{RunStats, StatsAggregator};
use super::strategy::{DocumentBackend, RedactionApplicator, ScrubDocument};
use crate::config::ProcessConfig;
use crate::domain::RuleTable;
use crate::error::RedactorResult;
use std::path::Path;
use tracing::{debug, info};

/// Draws replacement text into cleared translation regions.
///
/// The pipeline calls this once per page, after the page's redactions have
/// been applied. The default [`NoReinsertion`] draws nothing.
pub trait Reinsertion<P: ?Sized>: Send + Sync {
    fn reinsert(&self, page: &mut P, placements: &[Placement]) -> RedactorResult<()>;
}

/// Leaves cleared translation regions empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReinsertion;

impl<P: ?Sized> Reinsertion<P> for NoReinsertion {
    fn reinsert(&self, _page: &mut P, _placements: &[Placement]) -> RedactorResult<()> {
        Ok(())
    }
}

type PageOf<B> = <<B as DocumentBackend>::Document as ScrubDocument>::Page;

/// Runs the rule table over every page of a document.
///
/// The pipeline holds no per-document state, so one instance can serve
/// any number of sequential runs. Each run owns its document exclusively.
pub struct ProcessPipeline<B: DocumentBackend = MupdfBackend> {
    backend: B,
    rules: RuleTable,
    reinsertion: Box<dyn Reinsertion<PageOf<B>>>,
}

impl ProcessPipeline<MupdfBackend> {
    /// MuPDF backend with the standard rule table.
    pub fn with_standard_rules() -> Self {
        Self::new(MupdfBackend::new(), RuleTable::standard())
    }
}

impl<B: DocumentBackend> ProcessPipeline<B> {
    pub fn new(backend: B, rules: RuleTable) -> Self {
        Self {
            backend,
            rules,
            reinsertion: Box::new(NoReinsertion),
        }
    }

    /// Installs a translation reinsertion hook.
    pub fn with_reinsertion(mut self, reinsertion: Box<dyn Reinsertion<PageOf<B>>>) -> Self {
        self.reinsertion = reinsertion;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Processes `input` into `output`.
    ///
    /// # Errors
    /// - [`RedactorError::Open`](crate::RedactorError::Open) if the input is
    ///   not a parseable PDF; nothing is written.
    /// - [`RedactorError::Save`](crate::RedactorError::Save) if the output
    ///   cannot be persisted; whatever landed at `output` must be discarded.
    ///
    /// No partial statistics are returned on failure.
    pub fn process(
        &self,
        input: &Path,
        output: &Path,
        config: &ProcessConfig,
    ) -> RedactorResult<RunStats> {
        let mut stats = StatsAggregator::start();
        info!(
            input = %input.display(),
            backend = self.backend.name(),
            ?config,
            "processing document"
        );

        let mut document = self.backend.open(input)?;
        let planner = Planner::new(&self.rules);

        for index in 0..document.page_count() {
            let mut page = document.page(index)?;
            let plan = planner.plan(&page, config);
            let applied = page.apply(&plan.regions)?;
            if !plan.placements.is_empty() {
                self.reinsertion.reinsert(&mut page, &plan.placements)?;
            }
            stats.record_page(&plan, applied);
            debug!(page = plan.page, applied, "page committed");
        }

        let output_size = document.save(output)?;
        let references_removed = stats.references_removed();
        let regions_applied = stats.regions_applied();
        let rules_skipped = stats.rules_skipped();
        let result = stats.finish(output_size);

        info!(
            output = %output.display(),
            pages = result.pages,
            translations = result.translations,
            prices_removed = result.prices_removed,
            references_removed,
            regions_applied,
            rules_skipped,
            seconds = result.processing_time,
            bytes = result.output_size,
            "document processed"
        );
        Ok(result)
    }
}
