//! PDF text extraction, page by page.

use lopdf::Document;

use super::ExtractError;

/// Extracts text from a PDF as the in-order concatenation of per-page text.
///
/// A page that yields no text (scanned image, extraction failure on that one
/// page) contributes an empty string rather than failing the whole document.
/// Only a document that cannot be parsed at all is an error.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::PdfUnreadable(e.to_string()))?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        // A failing page contributes an empty string.
        if let Ok(page_text) = doc.extract_text(&[*page_number]) {
            text.push_str(&page_text);
        }
    }
    Ok(text)
}
