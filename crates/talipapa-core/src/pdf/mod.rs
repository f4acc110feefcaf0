//! PDF rasterization module.

mod extractor;

pub use extractor::{LopdfRasterizer, PdfDocument};

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for turning PDF bytes into page images.
pub trait PdfRasterizer {
    /// Produce the document's page images, in page order.
    fn rasterize(&self, data: &[u8]) -> Result<Vec<DynamicImage>>;

    /// Embedded text layer of the document, if the implementation has one.
    fn text_layer(&self, _data: &[u8]) -> Result<String> {
        Ok(String::new())
    }
}
