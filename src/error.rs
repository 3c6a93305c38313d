//! Error types for the comparison library.
//!
//! Every failure a comparison run can hit is expressed here. The orchestrator
//! absorbs all of them at its boundary and reports them through the event
//! channel; nothing in this crate panics on bad input.

use std::path::PathBuf;

/// Result type alias for comparison operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while comparing two documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document could not be opened, parsed, or rasterized.
    #[error("Failed to read document '{path}': {reason}")]
    DocumentRead {
        /// Path of the offending document
        path: PathBuf,
        /// Reason reported by the PDF backend
        reason: String,
    },

    /// The pdfium native library could not be located or loaded.
    #[error("Failed to bind the pdfium library: {0}")]
    PdfiumBind(String),

    /// Comparison requires at least one page in each document.
    #[error("No pages found in one or both documents")]
    EmptyDocument,

    /// OCR engine construction or text extraction failed.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// The report assembler was given no artifacts, or writing the report failed.
    #[error("Report error: {0}")]
    ReportWrite(String),

    /// The run was cancelled by the caller. Not a true failure; the
    /// orchestrator converts this into a clean `Cancelled` terminal state.
    #[error("Comparison cancelled by user")]
    Cancelled,

    /// Sensitivity outside the supported range.
    #[error("Invalid sensitivity {0}: expected a value in 0.5..=1.0")]
    InvalidSensitivity(f64),

    /// Image encoding or decoding error.
    #[error("Image error: {0}")]
    Image(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_read_error() {
        let err = Error::DocumentRead {
            path: PathBuf::from("missing.pdf"),
            reason: "file not found".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("missing.pdf"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_invalid_sensitivity_error() {
        let msg = format!("{}", Error::InvalidSensitivity(1.5));
        assert!(msg.contains("1.5"));
        assert!(msg.contains("0.5..=1.0"));
    }

    #[test]
    fn test_cancelled_is_not_phrased_as_failure() {
        let msg = format!("{}", Error::Cancelled);
        assert_eq!(msg, "Comparison cancelled by user");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
