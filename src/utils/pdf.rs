//! PDF text extraction utilities.
//!
//! Document previews in the terminal show the text of the document rather than
//! the rendered pages. Extraction is done in memory with the pdf-extract crate.

use thiserror::Error;

/// Leading bytes of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("Not a PDF document")]
    NotPdf,

    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),
}

/// Check whether a buffer looks like a PDF document.
pub fn is_pdf(bytes: &[u8]) -> bool {
    // Some servers prepend whitespace or a BOM before the header
    let start = bytes
        .iter()
        .take(1024)
        .position(|b| *b == b'%')
        .unwrap_or(0);
    bytes[start..].starts_with(PDF_MAGIC)
}

/// Extract text from an in-memory PDF document.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfExtractError> {
    if !is_pdf(bytes) {
        return Err(PdfExtractError::NotPdf);
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfExtractError::ExtractionFailed(e.to_string()))?;

    if text.trim().is_empty() {
        // Scanned or image-only documents extract to nothing
        tracing::debug!("Extracted empty text from PDF ({} bytes)", bytes.len());
    }

    Ok(text)
}

/// Collapse extracted text into readable paragraphs and cap it at `max_chars`.
///
/// Runs of blank lines become a single blank line and trailing whitespace is
/// dropped. Truncation happens on a char boundary and is marked with an ellipsis.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out = String::new();
    let mut blank_run = 0;

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == 1 && !out.is_empty() {
                out.push('\n');
            }
            continue;
        }
        blank_run = 0;
        out.push_str(line);
        out.push('\n');
    }

    let out = out.trim_end();
    if out.chars().count() <= max_chars {
        return out.to_string();
    }

    let mut clipped: String = out.chars().take(max_chars).collect();
    clipped.push('\u{2026}');
    clipped
}
