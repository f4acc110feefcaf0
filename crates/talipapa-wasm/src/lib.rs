//! WASM bindings for Talipapa cash invoice extraction.
//!
//! OCR runs on the JS side: the browser rasterizes uploads with
//! [`rasterize_pdf`], recognizes each page image, then hands the page texts
//! to a [`TalipapaBatch`] which extracts the fields and builds the download.

use std::io::Cursor;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use talipapa_core::export::{CsvExporter, XlsxExporter};
use talipapa_core::{
    BatchReport, ExtractedRecord, LopdfRasterizer, PdfRasterizer, ProcessedDocument,
    TableExporter, TalipapaConfig,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Collapse whitespace runs and lowercase, as done before field matching.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    talipapa_core::normalize_text(text)
}

/// Extract a record from recognized text.
///
/// Returns an object keyed by the spreadsheet column labels.
#[wasm_bindgen]
pub fn extract_fields(text: &str, file_name: &str) -> Result<JsValue, JsValue> {
    to_js(&ExtractedRecord::from_text(text, file_name))
}

/// Rasterize a scanned PDF into PNG-encoded page images, in page order.
#[wasm_bindgen]
pub fn rasterize_pdf(data: &[u8]) -> Result<js_sys::Array, JsValue> {
    let pages = LopdfRasterizer::default()
        .rasterize(data)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let out = js_sys::Array::new();
    for page in pages {
        let mut png = Cursor::new(Vec::new());
        page.write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        out.push(&js_sys::Uint8Array::from(png.get_ref().as_slice()));
    }

    Ok(out)
}

/// Records of one upload interaction, in upload order.
#[wasm_bindgen]
pub struct TalipapaBatch {
    report: BatchReport,
    config: TalipapaConfig,
}

#[wasm_bindgen]
impl TalipapaBatch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            report: BatchReport::default(),
            config: TalipapaConfig::default(),
        }
    }

    /// Add a document whose pages were recognized by the JS OCR engine.
    #[wasm_bindgen]
    pub fn add_document(&mut self, file_name: &str, page_texts: Vec<String>) -> Result<JsValue, JsValue> {
        let processed = ProcessedDocument::from_pages(file_name, &page_texts);
        let record = to_js(&processed.record)?;
        self.report.push(processed);
        Ok(record)
    }

    /// Add a document whose rasterization or OCR failed in JS.
    ///
    /// It still gets a row, with every field empty.
    #[wasm_bindgen]
    pub fn add_failed_document(&mut self, file_name: &str, error: &str) -> Result<JsValue, JsValue> {
        let processed = ProcessedDocument::from_text_result(file_name, Err(error));
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{}: {}",
            file_name,
            processed.warning.as_deref().unwrap_or(error)
        )));
        let record = to_js(&processed.record)?;
        self.report.push(processed);
        Ok(record)
    }

    /// All records added so far.
    #[wasm_bindgen]
    pub fn records(&self) -> Result<JsValue, JsValue> {
        to_js(&self.report.records())
    }

    /// `{ file_name, warning }` for each degraded document.
    #[wasm_bindgen]
    pub fn warnings(&self) -> Result<JsValue, JsValue> {
        #[derive(Serialize)]
        struct Warning<'a> {
            file_name: &'a str,
            warning: &'a str,
        }

        let warnings: Vec<Warning> = self
            .report
            .warnings()
            .into_iter()
            .map(|(file_name, warning)| Warning { file_name, warning })
            .collect();

        to_js(&warnings)
    }

    #[wasm_bindgen]
    pub fn len(&self) -> usize {
        self.report.len()
    }

    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }

    /// Workbook bytes, ready for a Blob download.
    #[wasm_bindgen]
    pub fn to_xlsx(&self) -> Result<Vec<u8>, JsValue> {
        XlsxExporter::new()
            .with_sheet_name(self.config.export.sheet_name.as_str())
            .serialize(&self.report.records())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn to_csv(&self) -> Result<String, JsValue> {
        let bytes = CsvExporter::new()
            .serialize(&self.report.records())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Suggested file name for the workbook download.
    #[wasm_bindgen]
    pub fn download_name(&self) -> String {
        self.config.export.file_name(talipapa_core::ExportFormat::Xlsx)
    }
}

impl Default for TalipapaBatch {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Hello\n\tWORLD"), "hello world");
    }

    #[wasm_bindgen_test]
    fn test_batch_keeps_failed_documents() {
        let mut batch = TalipapaBatch::new();
        batch
            .add_document(
                "a.pdf",
                vec![
                    "Date 12/03/2024 Bill# 12345".to_string(),
                    "Cash Out 250.75 Remarks: fish and rice".to_string(),
                ],
            )
            .unwrap();
        batch.add_failed_document("b.pdf", "timeout").unwrap();

        assert_eq!(batch.len(), 2);
        let csv = batch.to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "12/03/2024,12345,-250.75,fish and rice,OK,a.pdf");
        assert_eq!(lines[2], ",,,,Check Needed,b.pdf");
    }

    #[wasm_bindgen_test]
    fn test_download_name() {
        assert_eq!(TalipapaBatch::new().download_name(), "talipapa_output.xlsx");
    }

    #[wasm_bindgen_test]
    fn test_to_xlsx_is_zip() {
        let bytes = TalipapaBatch::new().to_xlsx().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
