//! Error types for the facturo-core library.

use thiserror::Error;

/// Main error type for the facturo library.
#[derive(Error, Debug)]
pub enum FacturoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON (configuration files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to invoice field extraction.
///
/// Field-level problems never show up here: an unparseable amount or a label
/// that does not match leaves the field empty instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document text is empty or whitespace only.
    #[error("document text is empty")]
    EmptyText,
}

/// Result type for the facturo library.
pub type Result<T> = std::result::Result<T, FacturoError>;
