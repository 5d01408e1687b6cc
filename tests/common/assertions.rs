//! Custom assertions for scrubbing tests.

use std::path::Path;

/// Asserts that `pattern` no longer appears in the PDF's text.
pub fn assert_redacted(pdf_path: &Path, pattern: &str) {
    let text = extract_text_or_panic(pdf_path);
    assert!(
        !text.contains(pattern),
        "Pattern '{}' should be redacted but was found in '{}'.\nExtracted text: {:?}",
        pattern,
        pdf_path.display(),
        text
    );
}

/// Asserts that `pattern` is still present in the PDF's text.
pub fn assert_preserved(pdf_path: &Path, pattern: &str) {
    let text = extract_text_or_panic(pdf_path);
    assert!(
        text.contains(pattern),
        "Pattern '{}' should be preserved but was not found in '{}'.\nExtracted text: {:?}",
        pattern,
        pdf_path.display(),
        text
    );
}

/// Asserts that a PDF exists, is non-empty and loads.
pub fn assert_valid_pdf(pdf_path: &Path) {
    assert!(
        pdf_path.exists(),
        "PDF should exist at '{}'",
        pdf_path.display()
    );

    let metadata = std::fs::metadata(pdf_path).expect("Failed to get PDF metadata");
    assert!(
        metadata.len() > 0,
        "PDF should not be empty at '{}'",
        pdf_path.display()
    );

    assert!(
        ::lopdf::Document::load(pdf_path).is_ok(),
        "PDF at '{}' should load",
        pdf_path.display()
    );
}

/// Text of the PDF with all whitespace runs collapsed to one space.
pub fn normalized_text(pdf_path: &Path) -> String {
    extract_text_or_panic(pdf_path)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn extract_text_or_panic(pdf_path: &Path) -> String {
    pdfscrub::extract_text_from_pdf(pdf_path).unwrap_or_else(|e| {
        panic!(
            "Failed to extract text from PDF '{}': {}",
            pdf_path.display(),
            e
        )
    })
}

/// Decoded content stream operations of every page, in page order.
pub fn page_operations(pdf_path: &Path) -> Vec<lopdf::content::Operation> {
    let doc = lopdf::Document::load(pdf_path).expect("PDF should load");
    doc.get_pages()
        .values()
        .flat_map(|&page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            lopdf::content::Content::decode(&content)
                .expect("content stream decodes")
                .operations
        })
        .collect()
}

/// Numeric operands of `op`, integers widened to floats.
pub fn numeric_operands(op: &lopdf::content::Operation) -> Vec<f32> {
    op.operands
        .iter()
        .filter_map(|operand| operand.as_float().ok())
        .collect()
}

/// Millimetres to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}
