//! PDF text extraction utilities.
//!
//! Extraction uses the pdf-extract crate, which needs the native poppler
//! libraries at runtime. When they are missing the error is reported as
//! [`PdfExtractError::NotAvailable`] with an installation hint.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("PDF extraction not available: install poppler/libpoppler for full functionality")]
    NotAvailable,

    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract text from a PDF file.
///
/// Returns the extracted text content, or an error if extraction fails.
/// An empty string is a valid result for scanned or image-only PDFs.
pub fn extract_text(path: &Path) -> Result<String, PdfExtractError> {
    if !path.exists() {
        return Err(PdfExtractError::InvalidFile(format!(
            "File not found: {}",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    match pdf_extract::extract_text(path) {
        Ok(text) => {
            if text.trim().is_empty() {
                tracing::debug!("Extracted empty text from PDF: {}", path.display());
            }
            Ok(text)
        }
        Err(e) => {
            let error_msg = e.to_string();
            // Common error patterns that indicate missing native libraries
            if error_msg.contains("libpoppler")
                || error_msg.contains("poppler")
                || error_msg.contains("dylib")
                || error_msg.contains("shared library")
                || error_msg.contains("cannot open shared object")
            {
                Err(PdfExtractError::NotAvailable)
            } else {
                Err(PdfExtractError::ExtractionFailed(error_msg))
            }
        }
    }
}
