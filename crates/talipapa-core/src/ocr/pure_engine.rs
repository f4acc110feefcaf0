//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::{ModelConfig, OcrConfig};

use super::{OcrEngine, OcrResult, TextBox};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: OcrConfig,
}

impl PureOcrEngine {
    /// Create an engine from the model files in a directory.
    pub fn from_dir(model_dir: &Path, models: &ModelConfig, config: OcrConfig) -> Result<Self, OcrError> {
        if !models.is_complete(model_dir) {
            return Err(OcrError::ModelLoad(format!(
                "model files missing in {} (expected {})",
                model_dir.display(),
                models.files().join(", ")
            )));
        }

        let det_path = model_dir.join(&models.detection_model);
        let rec_path = model_dir.join(&models.recognition_model);
        let dict_path = model_dir.join(&models.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine, config })
    }
}

impl OcrEngine for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!("{}x{}", width, height)));
        }

        debug!("Running OCR on {}x{} image", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let boxes: Vec<TextBox> = results
            .iter()
            .filter(|r| r.confidence >= self.config.min_confidence)
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextBox {
                    bbox: polygon_to_bbox(&r.bounding_box),
                    text,
                    confidence: r.confidence,
                }
            })
            .collect();

        let result = OcrResult::from_boxes(boxes, (width, height), start.elapsed().as_millis() as u64);

        debug!(
            "OCR complete: {} text boxes in {}ms",
            result.boxes.len(),
            result.processing_time_ms
        );

        Ok(result)
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
///
/// Extracts the first 4 exterior points (quadrilateral) as
/// `[x1, y1, x2, y2, x3, y3, x4, y4]`.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_models() {
        let dir = tempfile::tempdir().unwrap();
        let result = PureOcrEngine::from_dir(dir.path(), &ModelConfig::default(), OcrConfig::default());
        assert!(matches!(result, Err(OcrError::ModelLoad(_))));
    }
}
