//! Region location: turns a [`Term`] into boxes on a page.

use super::strategy::PageSurface;
use crate::domain::{dedup_regions, Region, Term, TextRun};
use crate::error::{RedactorError, RedactorResult};
use regex::Regex;
use std::ops::Range;
use tracing::trace;

/// Finds where terms occur on a page.
///
/// Terms are matched against the page's own text lines, so casing, word
/// boundaries and boxes all come from the same glyphs. Location is
/// page-local and never mutates the page, so calling [`Locator::locate`]
/// twice on an untouched page yields the same regions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Locator;

impl Locator {
    pub fn new() -> Self {
        Self
    }

    /// Returns every region where `term` occurs on `page`.
    ///
    /// Zero matches is not an error. A pattern that does not compile, or
    /// page text the backend cannot produce, is reported as
    /// [`RedactorError::Stage`].
    pub fn locate(&self, page: &dyn PageSurface, term: Term<'_>) -> RedactorResult<Vec<Region>> {
        let regions = match term {
            Term::Literal(text) => self.locate_literal(page, text),
            Term::Pattern(source) => self.locate_pattern(page, source),
        }
        .map_err(|e| match e {
            stage @ RedactorError::Stage { .. } => stage,
            other => RedactorError::Stage {
                rule: describe(term),
                page: page.number(),
                reason: other.to_string(),
            },
        })?;

        trace!(page = page.number(), term = ?term, hits = regions.len(), "located");
        Ok(regions)
    }

    fn locate_literal(&self, page: &dyn PageSurface, text: &str) -> RedactorResult<Vec<Region>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let lines = page.lines()?;
        Ok(collect_spans(lines, |line| {
            line.match_indices(text)
                .map(|(start, found)| start..start + found.len())
                .collect()
        }))
    }

    fn locate_pattern(&self, page: &dyn PageSurface, source: &str) -> RedactorResult<Vec<Region>> {
        let pattern = Regex::new(source).map_err(|e| RedactorError::Stage {
            rule: format!("pattern /{}/", source),
            page: page.number(),
            reason: e.to_string(),
        })?;

        let lines = page.lines()?;
        Ok(collect_spans(lines, |line| {
            pattern
                .find_iter(line)
                .filter(|m| !m.as_str().trim().is_empty())
                .map(|m| m.range())
                .collect()
        }))
    }
}

/// Maps the byte ranges found on each line to glyph boxes.
fn collect_spans<F>(lines: &[TextRun], find: F) -> Vec<Region>
where
    F: Fn(&str) -> Vec<Range<usize>>,
{
    let regions = lines
        .iter()
        .flat_map(|line| {
            find(line.text())
                .into_iter()
                .filter_map(move |range| line.span(range))
        })
        .collect();
    dedup_regions(regions)
}

fn describe(term: Term<'_>) -> String {
    match term {
        Term::Literal(text) => format!("'{}'", text),
        Term::Pattern(source) => format!("pattern /{}/", source),
    }
}
