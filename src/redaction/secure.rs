//! MuPDF backend.
//!
//! Page text comes from MuPDF's structured text, so every character carries
//! its own box. Applying a plan takes two passes over the page content:
//! MuPDF's redaction API removes text and image pixels under Redact
//! annotations, then a sanitize filter drops the vector paths the regions
//! cover and paints each region with an opaque white block.

use super::strategy::{DocumentBackend, PageSurface, RedactionApplicator, ScrubDocument};
use crate::domain::{Region, TextRun};
use crate::error::{RedactorError, RedactorResult};
use std::ffi::CString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfPage, PdfWriteOptions};
use mupdf::text_page::TextBlockType;
use mupdf::{Matrix, Page, Quad, TextPageOptions};

/// Colour of the blocks painted over redacted regions.
const FILL_RGB: [f32; 3] = [1.0, 1.0, 1.0];

/// Garbage collection level used on save (compact and drop unreferenced objects).
const GARBAGE_LEVEL: i32 = 3;

/// Opens documents with MuPDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for MupdfBackend {
    type Document = MupdfDocument;

    fn open(&self, input: &Path) -> RedactorResult<MupdfDocument> {
        let open_error = |reason: String| RedactorError::Open {
            path: input.to_path_buf(),
            reason,
        };

        let input_str = input.to_str().ok_or_else(|| RedactorError::InvalidInput {
            parameter: "input".to_string(),
            reason: "Path contains invalid UTF-8".to_string(),
        })?;

        // lopdf rejects truncated or non-PDF input that MuPDF would try to repair.
        lopdf::Document::load(input).map_err(|e| open_error(e.to_string()))?;

        let pdf = PdfDocument::open(input_str).map_err(|e| open_error(e.to_string()))?;
        let page_count = pdf.page_count().map_err(|e| open_error(e.to_string()))?;

        debug!(path = %input.display(), pages = page_count, "opened document");

        Ok(MupdfDocument {
            pdf,
            page_count: page_count.max(0) as usize,
        })
    }

    fn name(&self) -> &str {
        "MuPDF"
    }
}

/// A document opened by [`MupdfBackend`].
pub struct MupdfDocument {
    pdf: PdfDocument,
    page_count: usize,
}

impl ScrubDocument for MupdfDocument {
    type Page = MupdfPage;

    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page(&mut self, index: usize) -> RedactorResult<MupdfPage> {
        let number = index + 1;
        let page = self
            .pdf
            .load_page(index as i32)
            .map_err(|e| page_error(number, format!("Failed to load page {}", number), e))?;

        let bounds = page.bounds().map_err(|e| {
            page_error(number, format!("Failed to get bounds for page {}", number), e)
        })?;

        let pdf_page = PdfPage::try_from(page)
            .map_err(|e| page_error(number, "Page is not a PDF page", e))?;

        let lines = read_lines(&pdf_page).map_err(|e| {
            warn!(page = number, error = %e, "page text could not be read; rules will be skipped");
            e.to_string()
        });

        Ok(MupdfPage {
            number,
            pdf_page,
            bounds: Region::new(bounds.x0, bounds.y0, bounds.x1, bounds.y1),
            lines,
        })
    }

    fn save(&mut self, output: &Path) -> RedactorResult<u64> {
        let save_error = |reason: String| RedactorError::Save {
            path: output.to_path_buf(),
            reason,
        };

        let output_str = output.to_str().ok_or_else(|| RedactorError::InvalidInput {
            parameter: "output".to_string(),
            reason: "Path contains invalid UTF-8".to_string(),
        })?;

        let mut options = PdfWriteOptions::default();
        options.set_compress(true).set_garbage_level(GARBAGE_LEVEL);

        self.pdf
            .save_with_options(output_str, options)
            .map_err(|e| save_error(e.to_string()))?;

        let size = std::fs::metadata(output)
            .map_err(|e| save_error(e.to_string()))?
            .len();

        debug!(path = %output.display(), bytes = size, "saved document");
        Ok(size)
    }
}

/// One page of a [`MupdfDocument`].
pub struct MupdfPage {
    number: usize,
    pdf_page: PdfPage,
    bounds: Region,
    /// Structured text lines, or why they could not be read.
    lines: Result<Vec<TextRun>, String>,
}

impl MupdfPage {
    /// Points the most recently created annotation's `/Rect` at `rect`,
    /// given in PDF user space.
    fn set_last_annotation_rect(&self, rect: &Region) -> Result<(), mupdf::Error> {
        let page_obj = self.pdf_page.object();
        let annots = page_obj
            .get_dict("Annots")?
            .ok_or(mupdf::Error::UnexpectedNullPtr)?;
        let last = annots.len()? as i32 - 1;
        let mut annot_obj = annots
            .get_array(last)?
            .ok_or(mupdf::Error::UnexpectedNullPtr)?;

        let doc = page_obj.document().ok_or(mupdf::Error::InvalidPdfDocument)?;
        let value = doc.new_object_from_str(&format!(
            "[{} {} {} {}]",
            rect.x0, rect.y0, rect.x1, rect.y1
        ))?;
        annot_obj.dict_put("Rect", value)
    }
}

impl PageSurface for MupdfPage {
    fn number(&self) -> usize {
        self.number
    }

    fn bounds(&self) -> Region {
        self.bounds
    }

    fn lines(&self) -> RedactorResult<&[TextRun]> {
        match &self.lines {
            Ok(lines) => Ok(lines),
            Err(reason) => Err(RedactorError::PdfProcessing {
                message: format!("Page text unavailable: {}", reason),
                page: Some(self.number),
                source: None,
            }),
        }
    }
}

impl RedactionApplicator for MupdfPage {
    fn apply(&mut self, regions: &[Region]) -> RedactorResult<usize> {
        if regions.is_empty() {
            return Ok(0);
        }
        let number = self.number;

        // Annotation rects and content paths live in PDF user space.
        let ctm = self
            .pdf_page
            .ctm()
            .map_err(|e| page_error(number, "Failed to read page transform", e))?;
        let to_user = invert(&ctm).ok_or_else(|| RedactorError::PdfProcessing {
            message: "Page transform is not invertible".to_string(),
            page: Some(number),
            source: None,
        })?;
        let rects: Vec<Region> = regions
            .iter()
            .map(|region| transform_region(region, &to_user))
            .collect();

        let mut raw_page = std::ptr::null_mut();
        for rect in &rects {
            let annot = self
                .pdf_page
                .create_annotation(PdfAnnotationType::Redact)
                .map_err(|e| page_error(number, "Failed to create redaction annotation", e))?;
            self.set_last_annotation_rect(rect)
                .map_err(|e| page_error(number, "Failed to place redaction annotation", e))?;
            raw_page = unsafe { ffi::annotation_page(&annot) };
        }

        self.pdf_page.redact().map_err(|e| {
            page_error(number, format!("Failed to apply redactions on page {}", number), e)
        })?;

        let fill = CString::new(fill_operators(&rects, FILL_RGB)).map_err(|e| {
            RedactorError::PdfProcessing {
                message: "Invalid fill operators".to_string(),
                page: Some(number),
                source: Some(Box::new(e)),
            }
        })?;

        // SAFETY: `raw_page` belongs to `self.pdf_page`, which outlives the call.
        unsafe { ffi::cover_regions(raw_page, rects, fill) }.map_err(|e| {
            RedactorError::PdfProcessing {
                message: "Failed to paint redacted regions".to_string(),
                page: Some(number),
                source: Some(Box::new(e)),
            }
        })?;

        debug!(page = number, regions = regions.len(), "redactions applied");
        Ok(regions.len())
    }
}

fn page_error(number: usize, message: impl Into<String>, e: mupdf::Error) -> RedactorError {
    RedactorError::PdfProcessing {
        message: message.into(),
        page: Some(number),
        source: Some(Box::new(e)),
    }
}

/// Reads the text lines of a page with one box per character.
fn read_lines(page: &Page) -> Result<Vec<TextRun>, mupdf::Error> {
    let text_page = page.to_text_page(TextPageOptions::empty())?;

    let mut lines = Vec::new();
    for block in text_page.blocks() {
        if block.r#type() != TextBlockType::Text {
            continue;
        }
        for line in block.lines() {
            let mut run = TextRun::new();
            for ch in line.chars() {
                let c = ch.char().unwrap_or(char::REPLACEMENT_CHARACTER);
                run.push(c, quad_to_region(&ch.quad()));
            }
            if !run.is_empty() {
                lines.push(run);
            }
        }
    }
    Ok(lines)
}

/// Bounding rectangle of a character quad.
fn quad_to_region(quad: &Quad) -> Region {
    Region {
        x0: quad.ul.x.min(quad.ll.x).min(quad.ur.x).min(quad.lr.x),
        y0: quad.ul.y.min(quad.ll.y).min(quad.ur.y).min(quad.lr.y),
        x1: quad.ul.x.max(quad.ll.x).max(quad.ur.x).max(quad.lr.x),
        y1: quad.ul.y.max(quad.ll.y).max(quad.ur.y).max(quad.lr.y),
    }
}

fn invert(m: &Matrix) -> Option<Matrix> {
    let det = m.a * m.d - m.b * m.c;
    if det.abs() < f32::EPSILON {
        return None;
    }
    Some(Matrix::new(
        m.d / det,
        -m.b / det,
        -m.c / det,
        m.a / det,
        (m.c * m.f - m.d * m.e) / det,
        (m.b * m.e - m.a * m.f) / det,
    ))
}

/// Bounding box of `region` after transformation by `m`.
fn transform_region(region: &Region, m: &Matrix) -> Region {
    [
        (region.x0, region.y0),
        (region.x1, region.y0),
        (region.x0, region.y1),
        (region.x1, region.y1),
    ]
    .iter()
    .map(|&(x, y)| {
        let px = x * m.a + y * m.c + m.e;
        let py = x * m.b + y * m.d + m.f;
        Region::new(px, py, px, py)
    })
    .reduce(|acc, corner| acc.union(&corner))
    .unwrap_or(*region)
}

/// Content stream operators painting every rect, in user space, with `rgb`.
fn fill_operators(rects: &[Region], rgb: [f32; 3]) -> String {
    let mut ops = format!("q\n{} {} {} rg\n", rgb[0], rgb[1], rgb[2]);
    for rect in rects {
        ops.push_str(&format!(
            "{} {} {} {} re\n",
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        ));
    }
    ops.push_str("f\nQ\n");
    ops
}

/// Extracts the text of a whole PDF.
pub fn extract_text(input: &Path) -> RedactorResult<String> {
    let bytes = std::fs::read(input).map_err(|e| RedactorError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;

    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| RedactorError::TextExtraction {
        path: PathBuf::from(input),
        reason: e.to_string(),
    })
}

/// Raw MuPDF calls the safe bindings do not expose.
///
/// Every call that can throw goes through a `mupdf_*` wrapper with an error
/// out-parameter, so a MuPDF exception becomes an `Err` instead of aborting.
mod ffi {
    use crate::domain::Region;
    use mupdf::error::{ffi_error, MuPdfError};
    use mupdf::pdf::PdfAnnotation;
    use mupdf::Context;
    use mupdf_sys::{
        fz_buffer, fz_context, fz_cull_type, fz_rect, pdf_annot, pdf_filter_factory,
        pdf_filter_options, pdf_page, pdf_sanitize_filter_options,
    };
    use std::ffi::{c_int, c_void, CString};
    use std::ptr::{self, NonNull};

    #[repr(C)]
    struct PdfAnnotRaw {
        inner: *mut pdf_annot,
    }

    #[repr(C)]
    struct ContextRaw {
        inner: *mut fz_context,
    }

    /// The calling thread's MuPDF context, the one the safe bindings use.
    fn context() -> *mut fz_context {
        unsafe { std::mem::transmute::<Context, ContextRaw>(Context::get()).inner }
    }

    /// Page an annotation was created on.
    ///
    /// # Safety
    /// The annotation must be valid.
    pub unsafe fn annotation_page(annot: &PdfAnnotation) -> *mut pdf_page {
        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        mupdf_sys::pdf_annot_page(context(), annot_raw.inner)
    }

    /// Shared with the filter callbacks through their opaque pointer.
    struct Cover {
        rects: Vec<Region>,
        fill: CString,
    }

    unsafe extern "C" fn cull_covered(
        _ctx: *mut fz_context,
        opaque: *mut c_void,
        bbox: fz_rect,
        kind: fz_cull_type,
    ) -> c_int {
        let cover = &*(opaque as *const Cover);
        // Filled, stroked and clipping paths; glyphs, images and shadings stay.
        let is_path = matches!(kind as u32, 1..=3 | 5..=7);
        let bbox = Region::new(bbox.x0, bbox.y0, bbox.x1, bbox.y1);
        c_int::from(is_path && cover.rects.iter().any(|rect| rect.contains(&bbox)))
    }

    unsafe extern "C" fn append_fill(
        ctx: *mut fz_context,
        buffer: *mut fz_buffer,
        opaque: *mut c_void,
    ) {
        let cover = &*(opaque as *const Cover);
        mupdf_sys::fz_append_string(ctx, buffer, cover.fill.as_ptr());
    }

    /// Rewrites the page content, dropping paths that lie inside `rects` and
    /// appending `fill` after everything else. `rects` are in user space.
    ///
    /// # Safety
    /// `page` must point to a live page of a document opened on this thread.
    pub unsafe fn cover_regions(
        page: *mut pdf_page,
        rects: Vec<Region>,
        fill: CString,
    ) -> Result<(), MuPdfError> {
        let cover = Cover { rects, fill };
        let opaque = &cover as *const Cover as *mut c_void;

        let mut sanitize = pdf_sanitize_filter_options {
            opaque,
            image_filter: None,
            text_filter: None,
            after_text_object: None,
            culler: Some(cull_covered),
        };
        let mut filters = [
            pdf_filter_factory {
                filter: Some(mupdf_sys::pdf_new_sanitize_filter),
                options: &mut sanitize as *mut pdf_sanitize_filter_options as *mut c_void,
            },
            pdf_filter_factory {
                filter: None,
                options: ptr::null_mut(),
            },
        ];
        let mut options = pdf_filter_options {
            recurse: 0,
            instance_forms: 1,
            ascii: 1,
            no_update: 0,
            opaque,
            complete: Some(append_fill),
            filters: filters.as_mut_ptr(),
            newlines: 0,
        };

        let mut err = ptr::null_mut();
        mupdf_sys::mupdf_pdf_filter_page_contents(context(), page, &mut options, &mut err);
        match NonNull::new(err) {
            None => Ok(()),
            Some(err) => Err(ffi_error(err)),
        }
    }
}
