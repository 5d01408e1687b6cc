//! Test fixtures and PDF builders.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// A4 height in millimetres.
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Builder for multi-page test PDFs.
///
/// Lines are positioned by their distance from the top of the page, which
/// matches how redaction regions are expressed.
///
/// ```no_run
/// # use std::path::Path;
/// # fn main() -> anyhow::Result<()> {
/// TestPdfBuilder::new()
///     .line("Oferta", 40.0)
///     .page()
///     .line("Klamka okienna", 80.0)
///     .build(Path::new("/tmp/offer.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    pages: Vec<PageContent>,
    font_size: f32,
}

#[derive(Debug, Clone, Default)]
struct PageContent {
    lines: Vec<(String, f32, f32)>,
    /// Filled rectangles as `(x, top, width, height)` in millimetres,
    /// painted before any text.
    rects: Vec<(f32, f32, f32, f32)>,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            pages: vec![PageContent::default()],
            font_size: 12.0,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a line at the left margin, `top_mm` below the top edge.
    pub fn line(self, text: &str, top_mm: f32) -> Self {
        self.text_at(text, 20.0, top_mm)
    }

    /// Adds a text run at `x_mm`, `top_mm` below the top edge.
    pub fn text_at(mut self, text: &str, x_mm: f32, top_mm: f32) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.lines.push((text.to_string(), x_mm, top_mm));
        }
        self
    }

    /// Adds a filled grey rectangle whose top-left corner is `top_mm` below
    /// the top edge.
    pub fn filled_rect(mut self, x_mm: f32, top_mm: f32, width_mm: f32, height_mm: f32) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.rects.push((x_mm, top_mm, width_mm, height_mm));
        }
        self
    }

    /// Starts a new page.
    pub fn page(mut self) -> Self {
        self.pages.push(PageContent::default());
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            &self.title,
            Mm(210.0),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        for (index, content) in self.pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(210.0), Mm(PAGE_HEIGHT_MM), "Layer 1")
            };
            let current_layer = doc.get_page(page).get_layer(layer);

            if !content.rects.is_empty() {
                current_layer.set_fill_color(Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None)));
            }
            for (x_mm, top_mm, width_mm, height_mm) in &content.rects {
                let bottom = PAGE_HEIGHT_MM - top_mm - height_mm;
                let rect = Rect::new(
                    Mm(*x_mm),
                    Mm(bottom),
                    Mm(x_mm + width_mm),
                    Mm(bottom + height_mm),
                );
                current_layer.add_rect(rect.with_mode(path::PaintMode::Fill));
            }
            if !content.rects.is_empty() {
                current_layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
            }

            for (text, x_mm, top_mm) in &content.lines {
                current_layer.use_text(
                    text.clone(),
                    self.font_size,
                    Mm(*x_mm),
                    Mm(PAGE_HEIGHT_MM - top_mm),
                    &font,
                );
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Three pages; only the second carries the phrase "Klamka okienna".
pub fn create_three_page_offer(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Oferta")
        .line("Oferta handlowa", 60.0)
        .page()
        .line("Pozycja pierwsza", 60.0)
        .line("Klamka okienna", 90.0)
        .page()
        .line("Warunki dostawy", 60.0)
        .build(path)
}

/// One page with a single Italian price line and an unrelated line below it.
pub fn create_price_page(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Listino")
        .line("Prezzo: 1.234,56 PLN", 80.0)
        .line("Descrizione articolo", 120.0)
        .build(path)
}

/// One page exercising every stage.
pub fn create_full_document(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Zamowienie")
        .line("FIRMA OKNOPLAST", 12.0)
        .line("Zawias", 80.0)
        .line("Cena 99,00 PLN", 110.0)
        .line("Nr ref. ABC-123", 140.0)
        .line("Uwagi klienta", 200.0)
        .build(path)
}

/// A grey bar under a header line, plus a body line well below the band.
pub fn create_letterhead_page(path: &Path) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Papier firmowy")
        .filled_rect(20.0, 5.0, 80.0, 10.0)
        .line("NAGLOWEK FIRMY", 12.0)
        .line("Tresc pisma", 150.0)
        .build(path)
}

/// Bytes that no PDF parser accepts.
pub fn write_corrupt_pdf(path: &Path) -> Result<PathBuf> {
    fs::write(path, b"This is not a PDF document at all.\n")?;
    Ok(path.to_path_buf())
}
