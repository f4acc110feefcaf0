//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TalipapaError;
use crate::export::ExportFormat;

/// Main configuration for the talipapa pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TalipapaConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Spreadsheet export configuration.
    pub export: ExportConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Minimum recognition confidence to keep a text box (0.0 - 1.0).
    pub min_confidence: f32,

    /// Keep `[UNK]` tokens emitted for characters missing from the dictionary.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0, // Disabled - CTC confidence scores are inherently low
            keep_unk: false,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to rasterize per document (0 = unlimited).
    pub max_pages: usize,

    /// Use the embedded text layer when a PDF carries no page images.
    pub text_layer_fallback: bool,

    /// Minimum text-layer length to accept it as the document text.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            text_layer_fallback: false,
            min_text_length: 20,
        }
    }
}

/// Model file names and download location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files. Uses the per-user data dir when unset.
    pub model_dir: Option<PathBuf>,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Base URL the model files are downloaded from.
    pub download_base_url: String,
}

/// PP-OCR mobile detection and latin recognition models exported to ONNX.
pub const DEFAULT_MODEL_BASE_URL: &str = "https://github.com/jakubmatias/incr/raw/main/models/mobile";

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            download_base_url: DEFAULT_MODEL_BASE_URL.to_string(),
        }
    }
}

impl ModelConfig {
    /// File names of every model the OCR engine needs.
    pub fn files(&self) -> [&str; 3] {
        [
            self.detection_model.as_str(),
            self.recognition_model.as_str(),
            self.dictionary.as_str(),
        ]
    }

    /// Download URL of one model file, `None` when no base URL is set.
    pub fn file_url(&self, file_name: &str) -> Option<String> {
        let base = self.download_base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            None
        } else {
            Some(format!("{}/{}", base, file_name))
        }
    }

    /// Whether every model file exists in `dir`.
    pub fn is_complete(&self, dir: &Path) -> bool {
        self.files().iter().all(|name| dir.join(name).is_file())
    }
}

/// Spreadsheet export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default output format.
    pub format: ExportFormat,

    /// Default output file name (without extension).
    pub file_stem: String,

    /// Worksheet name for XLSX output.
    pub sheet_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Xlsx,
            file_stem: "talipapa_output".to_string(),
            sheet_name: "Talipapa".to_string(),
        }
    }
}

impl ExportConfig {
    /// Default download name for a format, e.g. `talipapa_output.xlsx`.
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.file_stem, format.extension())
    }
}

impl TalipapaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, TalipapaError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TalipapaError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), TalipapaError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TalipapaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = TalipapaConfig::default();
        config.pdf.max_pages = 3;
        config.export.format = ExportFormat::Csv;
        config.save(&path).unwrap();

        let loaded = TalipapaConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.max_pages, 3);
        assert_eq!(loaded.export.format, ExportFormat::Csv);
        assert_eq!(loaded.models.detection_model, "det.onnx");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: TalipapaConfig =
            serde_json::from_str(r#"{"pdf": {"text_layer_fallback": true}}"#).unwrap();

        assert!(config.pdf.text_layer_fallback);
        assert_eq!(config.pdf.min_text_length, 20);
        assert_eq!(config.export.sheet_name, "Talipapa");
    }

    #[test]
    fn test_model_urls() {
        let mut models = ModelConfig::default();
        assert_eq!(
            models.file_url("det.onnx").as_deref(),
            Some("https://github.com/jakubmatias/incr/raw/main/models/mobile/det.onnx")
        );

        models.download_base_url = "https://mirror.example/models/".to_string();
        assert_eq!(
            models.file_url("latin_dict.txt").as_deref(),
            Some("https://mirror.example/models/latin_dict.txt")
        );

        models.download_base_url = "  ".to_string();
        assert_eq!(models.file_url("det.onnx"), None);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            TalipapaConfig::from_file(&path),
            Err(TalipapaError::Config(_))
        ));
    }

    #[test]
    fn test_export_file_name() {
        let export = ExportConfig::default();
        assert_eq!(export.file_name(ExportFormat::Xlsx), "talipapa_output.xlsx");
        assert_eq!(export.file_name(ExportFormat::Csv), "talipapa_output.csv");
    }

    #[test]
    fn test_model_completeness() {
        let dir = tempfile::tempdir().unwrap();
        let models = ModelConfig::default();
        assert!(!models.is_complete(dir.path()));

        for name in models.files() {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        assert!(models.is_complete(dir.path()));
    }
}
