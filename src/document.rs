//! PDF text extraction
//!
//! Wraps the pdf-extract crate. Concatenates per-page text and fails when the
//! bytes are not a valid PDF or no text is recoverable (scanned/image-only
//! documents). This is the only failure that aborts a whole verification run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    InvalidPdf(String),
    #[error("No text could be extracted from the PDF")]
    NoText,
}

/// Extract full text from PDF bytes, trimmed.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ExtractError> {
    if !pdf_bytes.starts_with(b"%PDF") {
        return Err(ExtractError::InvalidPdf("not a PDF file".to_string()));
    }

    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| ExtractError::InvalidPdf(e.to_string()))?;

    // Drop blank pages/lines, keep the rest in document order
    let cleaned = text
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.trim().is_empty() {
        return Err(ExtractError::NoText);
    }

    Ok(cleaned.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let result = extract_text(b"this is not a pdf");
        assert!(matches!(result, Err(ExtractError::InvalidPdf(_))));
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        // Valid magic bytes but no document structure
        let result = extract_text(b"%PDF-1.7\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_error_message_mentions_pdf() {
        let err = extract_text(b"garbage").unwrap_err();
        assert!(err.to_string().contains("PDF"));
    }
}
