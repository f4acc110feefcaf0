//! Core library for Talipapa cash invoice processing.
//!
//! This crate provides:
//! - PDF rasterization of scanned invoices (page images via lopdf)
//! - OCR adapter over `pure-onnx-ocr`
//! - Field extraction from noisy OCR text (date, bill number, cash-out amount, remarks)
//! - Batch pipeline with per-document failure containment
//! - Spreadsheet export (XLSX, CSV, JSON)

pub mod error;
pub mod export;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;

pub use error::{TalipapaError, Result};
pub use export::{ExportFormat, TableExporter, COLUMNS};
pub use invoice::{normalize_text, ExtractedFields, FieldParser};
pub use models::config::TalipapaConfig;
pub use models::record::{ExtractedRecord, RecordStatus};
pub use ocr::{LazyOcrEngine, OcrEngine, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{LopdfRasterizer, PdfRasterizer};
pub use pipeline::{BatchProcessor, BatchReport, Document, DocumentKind, ProcessedDocument};
