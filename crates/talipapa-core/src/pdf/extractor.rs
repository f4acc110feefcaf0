//! Page image extraction from scanned PDFs using lopdf.
//!
//! Scanned cash slips are stored as one image XObject per page, so the
//! page images are decoded straight from the document instead of being
//! rendered.

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use tracing::{debug, trace};

use super::{PdfRasterizer, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// A loaded PDF document.
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfDocument {
    /// Load a PDF from bytes, decrypting empty-password documents.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(Self { document, raw_data })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Decode the image XObjects referenced by a page (1-indexed).
    pub fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let doc = &self.document;
        let pages = doc.get_pages();
        let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();

        if let Some(resources) = page_resources(doc, *page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobj_dict.iter() {
                        if let Ok((_, obj)) = doc.dereference(obj_ref) {
                            if let Some(img) = decode_image_object(doc, obj) {
                                images.push(img);
                            }
                        }
                    }
                }
            }
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }

    /// Decode every image object in the document, in object order.
    pub fn all_images(&self) -> Vec<DynamicImage> {
        let doc = &self.document;
        let mut images = Vec::new();
        let mut seen_objects: HashSet<ObjectId> = HashSet::new();

        for (id, object) in doc.objects.iter() {
            if !seen_objects.insert(*id) {
                continue;
            }
            if let Some(img) = decode_image_object(doc, object) {
                images.push(img);
            }
        }

        debug!("Found {} images in document", images.len());
        images
    }

    /// Extract the embedded text layer.
    pub fn extract_text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

/// Rasterizer for scanned PDFs built on lopdf.
pub struct LopdfRasterizer {
    config: PdfConfig,
}

impl LopdfRasterizer {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }
}

impl Default for LopdfRasterizer {
    fn default() -> Self {
        Self::new(PdfConfig::default())
    }
}

impl PdfRasterizer for LopdfRasterizer {
    fn rasterize(&self, data: &[u8]) -> Result<Vec<DynamicImage>> {
        let pdf = PdfDocument::load(data)?;

        let mut page_count = pdf.page_count();
        if self.config.max_pages > 0 {
            page_count = page_count.min(self.config.max_pages as u32);
        }

        let mut images = Vec::new();
        for page in 1..=page_count {
            images.extend(pdf.page_images(page)?);
        }

        // Some scanners write images without page-level resources
        if images.is_empty() {
            debug!("No XObject images on any page, scanning all objects");
            images = pdf.all_images();
            if self.config.max_pages > 0 {
                images.truncate(self.config.max_pages);
            }
        }

        debug!("Rasterized {} page images", images.len());
        Ok(images)
    }

    fn text_layer(&self, data: &[u8]) -> Result<String> {
        PdfDocument::load(data)?.extract_text()
    }
}

fn decode_image_object(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;

    trace!("Found image object: {}x{}", width, height);

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                // JPEG data, already compressed
                trace!("Decoding JPEG image");
                return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                    .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Unsupported image filter: {:?}", filter_name.map(String::from_utf8_lossy));
                return None;
            }
            _ => {}
        }
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8) as u8;

    image_from_raw(&data, width, height, color_space, bits)
}

fn image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: u8,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    // Dimensions come straight from the file
    let pixels = (width as usize).checked_mul(height as usize)?;
    let rgb_len = pixels.checked_mul(3)?;
    if pixels.checked_mul(4).is_none() {
        return None;
    }

    let rgba: Vec<u8> = match color_space {
        b"DeviceRGB" | b"RGB" if data.len() >= rgb_len => data[..rgb_len]
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        b"DeviceGray" | b"G" if data.len() >= pixels => data[..pixels]
            .iter()
            .flat_map(|&gray| [gray, gray, gray, 255])
            .collect(),
        _ => {
            trace!(
                "Could not decode image: colorspace={:?}, data_len={}, pixels={}",
                String::from_utf8_lossy(color_space),
                data.len(),
                pixels
            );
            return None;
        }
    };

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

/// Resources dictionary of a page, following `Parent` inheritance.
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let Object::Dictionary(dict) = doc.get_object(node_id).ok()? else {
        return None;
    };

    if let Ok(resources) = dict.get(b"Resources") {
        if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
            return Some(res_dict.clone());
        }
    }

    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => page_resources(doc, *parent_id),
        _ => None,
    }
}
