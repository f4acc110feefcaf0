//! Batch pipeline: rasterize, recognize, extract, tag.
//!
//! Documents are processed one after another in upload order. A failure in
//! any collaborator only affects its own document, which then carries empty
//! text and a warning.

use std::convert::Infallible;
use std::fmt::Display;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{OcrError, Result};
use crate::models::config::PdfConfig;
use crate::models::record::{ExtractedRecord, RecordStatus};
use crate::ocr::OcrEngine;
use crate::pdf::PdfRasterizer;

/// Kind of an uploaded document, decided by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Scanned PDF, rasterized before OCR.
    Pdf,
    /// Single page image, sent to OCR directly.
    Image,
}

impl DocumentKind {
    /// Extensions accepted as page images.
    pub const IMAGE_EXTENSIONS: [&'static str; 7] = ["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

    /// Classify a file name; anything that is not a known image is a PDF.
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if Self::IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            DocumentKind::Image
        } else {
            DocumentKind::Pdf
        }
    }
}

/// An uploaded document.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_file_name(&self.file_name)
    }
}

/// Outcome of processing a single document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub record: ExtractedRecord,
    /// Set when a collaborator failed and the text was replaced by nothing.
    pub warning: Option<String>,
}

impl ProcessedDocument {
    /// Build the outcome from a text result, substituting empty text on error.
    pub fn from_text_result<E: Display>(
        file_name: impl Into<String>,
        text: std::result::Result<String, E>,
    ) -> Self {
        let file_name = file_name.into();
        match text {
            Ok(text) => Self {
                record: ExtractedRecord::from_text(&text, file_name),
                warning: None,
            },
            Err(e) => Self::failed(file_name, format!("OCR failed: {}", e)),
        }
    }

    /// An empty record for a document that produced no text at all.
    pub fn failed(file_name: impl Into<String>, warning: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let warning = warning.into();
        warn!("{}: {}", file_name, warning);
        Self {
            record: ExtractedRecord::from_text("", file_name),
            warning: Some(warning),
        }
    }

    /// Build the outcome from already recognized page texts.
    pub fn from_pages<S: AsRef<str>>(file_name: impl Into<String>, pages: &[S]) -> Self {
        Self::from_text_result(file_name, Ok::<_, Infallible>(join_pages(pages)))
    }

    pub fn is_failed(&self) -> bool {
        self.warning.is_some()
    }
}

/// Ordered outcomes of one upload batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub documents: Vec<ProcessedDocument>,
}

impl BatchReport {
    pub fn push(&mut self, document: ProcessedDocument) {
        self.documents.push(document);
    }

    /// Records in upload order.
    pub fn records(&self) -> Vec<ExtractedRecord> {
        self.documents.iter().map(|d| d.record.clone()).collect()
    }

    /// `(file name, warning)` pairs for degraded documents.
    pub fn warnings(&self) -> Vec<(&str, &str)> {
        self.documents
            .iter()
            .filter_map(|d| d.warning.as_deref().map(|w| (d.record.file_name(), w)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ok_count(&self) -> usize {
        self.count_status(RecordStatus::Ok)
    }

    pub fn check_needed_count(&self) -> usize {
        self.count_status(RecordStatus::CheckNeeded)
    }

    /// Sum of all extracted amounts (negative, as they are outflows).
    pub fn total_outflow(&self) -> Decimal {
        self.documents
            .iter()
            .filter_map(|d| d.record.amount_value())
            .sum()
    }

    fn count_status(&self, status: RecordStatus) -> usize {
        self.documents
            .iter()
            .filter(|d| d.record.status() == status)
            .count()
    }
}

/// Sequential document processor over a rasterizer and an OCR engine.
pub struct BatchProcessor<R, O> {
    rasterizer: R,
    ocr: O,
    config: PdfConfig,
}

impl<R: PdfRasterizer, O: OcrEngine> BatchProcessor<R, O> {
    pub fn new(rasterizer: R, ocr: O) -> Self {
        Self {
            rasterizer,
            ocr,
            config: PdfConfig::default(),
        }
    }

    /// Set the PDF configuration (text-layer fallback).
    pub fn with_config(mut self, config: PdfConfig) -> Self {
        self.config = config;
        self
    }

    /// Rasterize a PDF and OCR every page, joining page texts in order.
    pub fn document_text(&self, data: &[u8]) -> Result<String> {
        let images = self.rasterizer.rasterize(data)?;
        debug!("Rasterized {} page images", images.len());

        if images.is_empty() && self.config.text_layer_fallback {
            let text = self.rasterizer.text_layer(data)?;
            if text.trim().len() >= self.config.min_text_length {
                debug!("No page images, using {} chars of embedded text", text.len());
                return Ok(text);
            }
        }

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let text = self.ocr.recognize_text(image)?;
            debug!("Page {}: {} chars recognized", i + 1, text.len());
            pages.push(text);
        }

        Ok(join_pages(&pages))
    }

    /// Decode a page image and OCR it.
    pub fn image_text(&self, data: &[u8]) -> Result<String> {
        let image = image::load_from_memory(data)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        Ok(self.ocr.recognize_text(&image)?)
    }

    /// Process one document into its record.
    pub fn process_document(&self, document: &Document) -> ProcessedDocument {
        info!("Processing: {}", document.file_name);
        let text = match document.kind() {
            DocumentKind::Pdf => self.document_text(&document.data),
            DocumentKind::Image => self.image_text(&document.data),
        };
        let processed = ProcessedDocument::from_text_result(&document.file_name, text);
        debug!(
            "{} -> {}",
            document.file_name,
            processed.record.status()
        );
        processed
    }

    /// Process a batch, strictly in order.
    pub fn process_batch(&self, documents: &[Document]) -> BatchReport {
        let mut report = BatchReport::default();
        for document in documents {
            report.push(self.process_document(document));
        }

        info!(
            "Batch complete: {} documents, {} OK, {} need checking",
            report.len(),
            report.ok_count(),
            report.check_needed_count()
        );
        report
    }
}

/// Join page texts, page 1 first.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::ocr::OcrResult;
    use image::DynamicImage;
    use pretty_assertions::assert_eq;

    /// Treats the PDF bytes as UTF-8 and yields one tiny image per `|`-separated page,
    /// with the page index encoded in the image width.
    struct FakeRasterizer;

    impl PdfRasterizer for FakeRasterizer {
        fn rasterize(&self, data: &[u8]) -> crate::pdf::Result<Vec<DynamicImage>> {
            let text = std::str::from_utf8(data).map_err(|e| PdfError::Parse(e.to_string()))?;
            if text.is_empty() {
                return Err(PdfError::NoPages);
            }
            Ok((0..text.split('|').count())
                .map(|i| DynamicImage::new_rgb8(i as u32 + 1, 1))
                .collect())
        }

        fn text_layer(&self, _data: &[u8]) -> crate::pdf::Result<String> {
            Ok("text layer: bill #99999 with enough characters".to_string())
        }
    }

    /// Returns fixed page texts keyed by image width.
    struct FakeOcr {
        pages: Vec<&'static str>,
    }

    impl OcrEngine for FakeOcr {
        fn recognize(&self, image: &DynamicImage) -> std::result::Result<OcrResult, OcrError> {
            let index = image.width() as usize - 1;
            let text = self
                .pages
                .get(index)
                .ok_or_else(|| OcrError::Recognition(format!("no text for page {}", index + 1)))?;
            let mut result = OcrResult::empty(image.width(), image.height());
            result.text = text.to_string();
            Ok(result)
        }
    }

    fn processor(pages: Vec<&'static str>) -> BatchProcessor<FakeRasterizer, FakeOcr> {
        BatchProcessor::new(FakeRasterizer, FakeOcr { pages })
    }

    #[test]
    fn test_batch_keeps_order_and_contains_failures() {
        let processor = processor(vec![
            "Date: 12-04-2024  Bill #12345",
            "CASH OUT: 1500.00\nRemarks: vegetables, market",
        ]);
        let documents = vec![
            Document::new("good.pdf", b"p1|p2".to_vec()),
            Document::new("broken.pdf", Vec::new()),
        ];

        let report = processor.process_batch(&documents);
        let records = report.records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_name(), "good.pdf");
        assert_eq!(records[0].date(), "12-04-2024");
        assert_eq!(records[0].invoice_number(), "12345");
        assert_eq!(records[0].amount(), "-1500.00");
        assert_eq!(records[0].remarks(), "vegetables, market");
        assert_eq!(records[0].status(), RecordStatus::Ok);

        assert_eq!(records[1].file_name(), "broken.pdf");
        assert_eq!(records[1].cells(), ["", "", "", "", "Check Needed", "broken.pdf"]);

        assert_eq!(report.ok_count(), 1);
        assert_eq!(report.check_needed_count(), 1);
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].0, "broken.pdf");
    }

    #[test]
    fn test_page_text_order() {
        let processor = processor(vec!["first page", "second page"]);
        assert_eq!(
            processor.document_text(b"a|b").unwrap(),
            "first page\nsecond page"
        );
    }

    #[test]
    fn test_ocr_failure_on_any_page_degrades_document() {
        let processor = processor(vec!["bill #12345"]);
        let processed = processor.process_document(&Document::new("two-pages.pdf", b"a|b".to_vec()));

        assert!(processed.is_failed());
        assert_eq!(processed.record.invoice_number(), "");
        assert_eq!(processed.record.status(), RecordStatus::CheckNeeded);
    }

    #[test]
    fn test_empty_batch() {
        let report = processor(vec![]).process_batch(&[]);
        assert!(report.is_empty());
        assert_eq!(report.total_outflow(), Decimal::ZERO);
    }

    #[test]
    fn test_total_outflow() {
        let mut report = BatchReport::default();
        report.push(ProcessedDocument::from_pages("a.pdf", &["cash out 10.50"]));
        report.push(ProcessedDocument::from_pages("b.pdf", &["cash: 4.25"]));
        report.push(ProcessedDocument::from_pages("c.pdf", &["nothing"]));

        assert_eq!(report.total_outflow(), Decimal::new(-1475, 2));
    }

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_file_name("slip.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("slip.JPG"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_file_name("no-extension"), DocumentKind::Pdf);
    }

    #[test]
    fn test_image_document() {
        let mut png = Vec::new();
        DynamicImage::new_rgb8(1, 1)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let processor = processor(vec!["Bill #13579"]);
        let processed = processor.process_document(&Document::new("photo.png", png));
        assert_eq!(processed.record.invoice_number(), "13579");

        let broken = processor.process_document(&Document::new("photo.jpg", b"nope".to_vec()));
        assert!(broken.is_failed());
    }

    #[test]
    fn test_from_text_result_error() {
        let processed = ProcessedDocument::from_text_result("x.pdf", Err::<String, _>("engine crashed"));
        assert_eq!(processed.warning.as_deref(), Some("OCR failed: engine crashed"));
        assert_eq!(processed.record.file_name(), "x.pdf");
    }

    #[test]
    fn test_failed_keeps_warning_text() {
        let processed = ProcessedDocument::failed("gone.pdf", "could not read file: not found");
        assert!(processed.is_failed());
        assert_eq!(processed.warning.as_deref(), Some("could not read file: not found"));
        assert_eq!(processed.record.status(), RecordStatus::CheckNeeded);
        assert_eq!(processed.record.cells()[..4], ["", "", "", ""]);
    }

    /// Rasterizer for born-digital PDFs: no page images at all.
    struct TextOnlyRasterizer;

    impl PdfRasterizer for TextOnlyRasterizer {
        fn rasterize(&self, _data: &[u8]) -> crate::pdf::Result<Vec<DynamicImage>> {
            Ok(Vec::new())
        }

        fn text_layer(&self, _data: &[u8]) -> crate::pdf::Result<String> {
            Ok("Bill #24680 and some more embedded text".to_string())
        }
    }

    #[test]
    fn test_text_layer_fallback() {
        let ocr = FakeOcr { pages: vec![] };
        let disabled = BatchProcessor::new(TextOnlyRasterizer, ocr);
        assert_eq!(disabled.document_text(b"pdf").unwrap(), "");

        let enabled = BatchProcessor::new(TextOnlyRasterizer, FakeOcr { pages: vec![] }).with_config(PdfConfig {
            text_layer_fallback: true,
            ..PdfConfig::default()
        });
        let processed = enabled.process_document(&Document::new("digital.pdf", b"pdf".to_vec()));
        assert_eq!(processed.record.invoice_number(), "24680");
    }
}
