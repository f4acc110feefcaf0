//! Deferred engine loading.

use std::cell::OnceCell;

use image::DynamicImage;
use tracing::{debug, warn};

use super::{OcrEngine, OcrResult};
use crate::error::OcrError;

/// Loads the wrapped engine on first use.
///
/// Batches of broken or text-free PDFs never pay for model loading. A
/// load failure is kept and returned for every later call, so each
/// document needing OCR degrades on its own.
pub struct LazyOcrEngine<E, F> {
    loader: F,
    engine: OnceCell<Result<E, OcrError>>,
}

impl<E, F> LazyOcrEngine<E, F>
where
    E: OcrEngine,
    F: Fn() -> Result<E, OcrError>,
{
    pub fn new(loader: F) -> Self {
        Self {
            loader,
            engine: OnceCell::new(),
        }
    }

    /// Whether loading has been attempted.
    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    fn engine(&self) -> Result<&E, OcrError> {
        self.engine
            .get_or_init(|| {
                debug!("Loading OCR engine");
                let loaded = (self.loader)();
                if let Err(e) = &loaded {
                    warn!("OCR engine unavailable: {}", e);
                }
                loaded
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl<E, F> OcrEngine for LazyOcrEngine<E, F>
where
    E: OcrEngine,
    F: Fn() -> Result<E, OcrError>,
{
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        self.engine()?.recognize(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedEngine;

    impl OcrEngine for FixedEngine {
        fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
            let mut result = OcrResult::empty(image.width(), image.height());
            result.text = "bill #12345".to_string();
            Ok(result)
        }
    }

    #[test]
    fn test_loads_once_on_first_use() {
        let loads = Cell::new(0);
        let engine = LazyOcrEngine::new(|| {
            loads.set(loads.get() + 1);
            Ok(FixedEngine)
        });
        assert!(!engine.is_loaded());

        let image = DynamicImage::new_rgb8(4, 4);
        assert_eq!(engine.recognize_text(&image).unwrap(), "bill #12345");
        assert_eq!(engine.recognize_text(&image).unwrap(), "bill #12345");
        assert_eq!(loads.get(), 1);
        assert!(engine.is_loaded());
    }

    #[test]
    fn test_load_failure_is_repeated() {
        let engine = LazyOcrEngine::new(|| -> Result<FixedEngine, OcrError> {
            Err(OcrError::ModelLoad("det.onnx missing".to_string()))
        });

        let image = DynamicImage::new_rgb8(4, 4);
        for _ in 0..2 {
            assert!(matches!(engine.recognize(&image), Err(OcrError::ModelLoad(_))));
        }
    }
}
