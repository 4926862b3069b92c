//! Document text extraction.
//!
//! [`DocumentExtractor`] turns a file on disk into plain text. [`PdfExtractor`] reads PDFs
//! with `lopdf`, page by page in page order, and concatenates the page texts. Extraction is
//! blocking; async callers run it on a blocking thread.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::ExtractError;

/// Converts a stored document into plain text.
///
/// **Interaction**: Called by the upload route and by `docchat ask` before
/// [`crate::ContextManager::set_document`].
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// PDF text extractor backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = std::fs::read(path)?;
        let doc = Document::load_mem(&bytes).map_err(|e| ExtractError::Load(e.to_string()))?;

        let pages = doc.get_pages();
        let mut text = String::new();
        for page_number in pages.keys() {
            let page_text = doc
                .extract_text(&[*page_number])
                .map_err(|e| ExtractError::Page {
                    page: *page_number,
                    message: e.to_string(),
                })?;
            text.push_str(&page_text);
        }
        debug!(
            path = %path.display(),
            pages = pages.len(),
            text_len = text.len(),
            "extracted pdf text"
        );
        Ok(text)
    }
}

/// True when `filename` has a `.pdf` extension (case-insensitive).
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Reduces a client-supplied filename to a safe single path component.
///
/// Keeps only the final component (after `/` or `\`), replaces every character outside
/// `[A-Za-z0-9._-]` with `_` and strips leading dots. Returns `"upload"` when nothing is left.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
