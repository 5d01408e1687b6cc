//! In-memory backend used by unit tests.

use super::strategy::{DocumentBackend, PageSurface, RedactionApplicator, ScrubDocument};
use crate::domain::{Region, TextRun};
use crate::error::{RedactorError, RedactorResult};
use std::path::Path;
use std::sync::{Arc, Mutex};

const GLYPH_WIDTH: f32 = 6.0;
const LINE_HEIGHT: f32 = 12.0;

/// Regions applied per page number, in call order.
pub type ApplyLog = Arc<Mutex<Vec<(usize, Vec<Region>)>>>;

#[derive(Debug, Clone)]
pub struct FakePage {
    number: usize,
    width: f32,
    height: f32,
    lines: Vec<TextRun>,
    failing_text: bool,
    log: ApplyLog,
}

impl FakePage {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            width: 595.0,
            height: 842.0,
            lines: Vec::new(),
            failing_text: false,
            log: ApplyLog::default(),
        }
    }

    /// Adds a line of fixed-width glyphs starting at `(x, y)`.
    pub fn line(mut self, text: &str, x: f32, y: f32) -> Self {
        let mut run = TextRun::new();
        for (column, ch) in text.chars().enumerate() {
            let x0 = x + column as f32 * GLYPH_WIDTH;
            run.push(ch, Region::new(x0, y, x0 + GLYPH_WIDTH, y + LINE_HEIGHT));
        }
        self.lines.push(run);
        self
    }

    /// Makes text extraction fail, as for a page whose content cannot be
    /// interpreted.
    pub fn failing_text(mut self) -> Self {
        self.failing_text = true;
        self
    }

    fn with_log(mut self, log: ApplyLog) -> Self {
        self.log = log;
        self
    }
}

impl PageSurface for FakePage {
    fn number(&self) -> usize {
        self.number
    }

    fn bounds(&self) -> Region {
        Region::new(0.0, 0.0, self.width, self.height)
    }

    fn lines(&self) -> RedactorResult<&[TextRun]> {
        if self.failing_text {
            return Err(RedactorError::PdfProcessing {
                message: "text extraction failed".to_string(),
                page: Some(self.number),
                source: None,
            });
        }
        Ok(&self.lines)
    }
}

impl RedactionApplicator for FakePage {
    fn apply(&mut self, regions: &[Region]) -> RedactorResult<usize> {
        let mut log = self.log.lock().expect("apply log poisoned");
        log.push((self.number, regions.to_vec()));
        Ok(regions.len())
    }
}

#[derive(Debug)]
pub struct FakeDocument {
    pages: Vec<FakePage>,
    fail_save: bool,
}

impl ScrubDocument for FakeDocument {
    type Page = FakePage;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&mut self, index: usize) -> RedactorResult<FakePage> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| RedactorError::PdfProcessing {
                message: format!("no page at index {}", index),
                page: Some(index + 1),
                source: None,
            })
    }

    fn save(&mut self, output: &Path) -> RedactorResult<u64> {
        if self.fail_save {
            return Err(RedactorError::Save {
                path: output.to_path_buf(),
                reason: "destination unwritable".to_string(),
            });
        }
        Ok(1024)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    pages: Vec<FakePage>,
    pub log: ApplyLog,
    fail_open: bool,
    fail_save: bool,
}

impl FakeBackend {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Default::default()
        }
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn applied(&self) -> Vec<(usize, Vec<Region>)> {
        self.log.lock().expect("apply log poisoned").clone()
    }
}

impl DocumentBackend for FakeBackend {
    type Document = FakeDocument;

    fn open(&self, input: &Path) -> RedactorResult<FakeDocument> {
        if self.fail_open {
            return Err(RedactorError::Open {
                path: input.to_path_buf(),
                reason: "not a PDF".to_string(),
            });
        }
        Ok(FakeDocument {
            pages: self
                .pages
                .iter()
                .cloned()
                .map(|p| p.with_log(Arc::clone(&self.log)))
                .collect(),
            fail_save: self.fail_save,
        })
    }

    fn name(&self) -> &str {
        "Fake"
    }
}
