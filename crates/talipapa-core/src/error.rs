//! Error types for the talipapa-core library.

use thiserror::Error;

/// Main error type for the talipapa library.
#[derive(Error, Debug)]
pub enum TalipapaError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Spreadsheet export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

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

    /// Failed to extract the embedded text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug, Clone)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to table export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// XLSX serialization failed.
    #[error("XLSX export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Writer could not be finalized.
    #[error("export buffer error: {0}")]
    Buffer(String),
}

/// Result type for the talipapa library.
pub type Result<T> = std::result::Result<T, TalipapaError>;
