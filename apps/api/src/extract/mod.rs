//! Content Extractor — turns an uploaded document or a job-posting URL into
//! plain UTF-8 text.
//!
//! Every path returns a typed `ExtractError` on failure. Callers branch on
//! the `Result`, never on sentinel substrings in the text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod web;

/// Where an extracted document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Upload,
    Url,
    Pasted,
}

/// A successfully extracted document. Immutable once produced; held by the
/// owning session until reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub source: SourceKind,
    pub text: String,
}

impl ExtractedDocument {
    pub fn new(source: SourceKind, text: String) -> Self {
        Self { source, text }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF unreadable: {0}")]
    PdfUnreadable(String),

    #[error("Word document unreadable: {0}")]
    DocxUnreadable(String),

    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("'{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

impl ExtractError {
    /// Stable reason code surfaced in API error bodies.
    pub fn reason_code(&self) -> &'static str {
        match self {
            ExtractError::PdfUnreadable(_) => "PDF_UNREADABLE",
            ExtractError::DocxUnreadable(_) => "DOCX_UNREADABLE",
            ExtractError::Fetch { .. } => "FETCH_FAILED",
            ExtractError::HttpStatus { .. } => "FETCH_BAD_STATUS",
            ExtractError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
        }
    }
}

/// Dispatches an uploaded file to the matching extractor by file extension.
pub fn extract_upload(filename: &str, bytes: &[u8]) -> Result<ExtractedDocument, ExtractError> {
    let lower = filename.to_lowercase();
    let text = if lower.ends_with(".pdf") {
        pdf::extract_text(bytes)?
    } else if lower.ends_with(".docx") {
        docx::extract_text(bytes)?
    } else {
        return Err(ExtractError::UnsupportedFormat(filename.to_string()));
    };
    Ok(ExtractedDocument::new(SourceKind::Upload, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_upload_rejects_unknown_extension() {
        let err = extract_upload("resume.txt", b"plain text").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
        assert_eq!(err.reason_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_extract_upload_extension_is_case_insensitive() {
        // Garbage bytes: must route to the PDF extractor and fail there,
        // not fall through to UnsupportedFormat.
        let err = extract_upload("Resume.PDF", b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::PdfUnreadable(_)));
    }
}
