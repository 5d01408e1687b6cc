//! Backend seams for the scrubbing pipeline.
//!
//! The pipeline never talks to a PDF library directly. It opens documents
//! through a [`DocumentBackend`], reads pages through [`PageSurface`] and
//! mutates them through [`RedactionApplicator`]. The MuPDF implementation
//! lives in [`super::secure`].

use crate::domain::{Region, TextRun};
use crate::error::RedactorResult;
use std::path::Path;

/// Read-only view of one page, used while planning.
pub trait PageSurface {
    /// 1-based page number.
    fn number(&self) -> usize;

    /// Page bounds in page coordinates.
    fn bounds(&self) -> Region;

    /// The page's text lines with per-character boxes, in reading order.
    fn lines(&self) -> RedactorResult<&[TextRun]>;
}

/// Irreversible page mutation.
pub trait RedactionApplicator {
    /// Stamps every region as an opaque white block, removing what lies
    /// beneath, and commits the page. Returns the number of regions applied.
    fn apply(&mut self, regions: &[Region]) -> RedactorResult<usize>;
}

/// A page that can be planned and then redacted.
pub trait ScrubPage: PageSurface + RedactionApplicator {}

impl<T: PageSurface + RedactionApplicator> ScrubPage for T {}

/// An open document owned by a single pipeline run.
pub trait ScrubDocument {
    type Page: ScrubPage;

    fn page_count(&self) -> usize;

    /// Loads the page at 0-based `index`.
    fn page(&mut self, index: usize) -> RedactorResult<Self::Page>;

    /// Writes the document with compression and unreferenced-object
    /// collection. Returns the size in bytes of the persisted file.
    fn save(&mut self, output: &Path) -> RedactorResult<u64>;
}

/// Opens documents.
pub trait DocumentBackend: Send + Sync {
    type Document: ScrubDocument;

    fn open(&self, input: &Path) -> RedactorResult<Self::Document>;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &str;
}
