//! OCR adapter layer.
//!
//! The extraction pipeline only needs text from a page image; concrete
//! engines live behind [`OcrEngine`].

mod lazy;
#[cfg(feature = "native")]
mod pure_engine;

pub use lazy::LazyOcrEngine;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Trait for engines turning a page image into text.
pub trait OcrEngine {
    /// Recognize text boxes in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;

    /// Recognize an image and return its text in reading order.
    fn recognize_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        Ok(self.recognize(image)?.text)
    }
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text (boxes joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Build a result from unordered boxes, sorting them into reading order.
    pub fn from_boxes(mut boxes: Vec<TextBox>, image_size: (u32, u32), processing_time_ms: u64) -> Self {
        sort_by_reading_order(&mut boxes);
        let text = boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            boxes,
            text,
            processing_time_ms,
            image_size,
        }
    }

    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self::from_boxes(Vec::new(), (width, height), 0)
    }
}

/// Sort boxes top-to-bottom, then left-to-right within a row.
fn sort_by_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();

        // Group by approximate vertical position (within 20 pixels)
        let row_a = (ay / 20.0) as i32;
        let row_b = (by / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_reading_order() {
        let boxes = vec![
            text_box("12345", 120.0, 42.0),
            text_box("cash out", 10.0, 80.0),
            text_box("bill #", 10.0, 45.0),
            text_box("date 01-01-2024", 10.0, 5.0),
        ];

        let result = OcrResult::from_boxes(boxes, (200, 100), 3);
        assert_eq!(result.text, "date 01-01-2024\nbill #\n12345\ncash out");
    }

    #[test]
    fn test_empty_result() {
        let result = OcrResult::empty(10, 20);
        assert!(result.text.is_empty());
        assert_eq!(result.image_size, (10, 20));
    }
}
