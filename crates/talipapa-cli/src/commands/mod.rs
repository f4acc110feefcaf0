//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod models;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use talipapa_core::error::OcrError;
use talipapa_core::{
    BatchProcessor, LazyOcrEngine, LopdfRasterizer, PureOcrEngine, TalipapaConfig,
};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("talipapa")
        .join("config.json")
}

/// Load the configuration from `path`, the default location, or defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<TalipapaConfig> {
    if let Some(path) = path {
        return Ok(TalipapaConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(TalipapaConfig::from_file(&default_path)?)
    } else {
        Ok(TalipapaConfig::default())
    }
}

/// Directory the OCR model files live in.
pub fn model_dir(config: &TalipapaConfig) -> PathBuf {
    config.models.model_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("talipapa")
            .join("models")
    })
}

/// Build the document processor. OCR models are loaded on first use.
pub fn build_processor(
    config: &TalipapaConfig,
) -> BatchProcessor<LopdfRasterizer, LazyOcrEngine<PureOcrEngine, impl Fn() -> Result<PureOcrEngine, OcrError>>>
{
    let dir = model_dir(config);
    let models = config.models.clone();
    let ocr_config = config.ocr.clone();

    let ocr = LazyOcrEngine::new(move || {
        PureOcrEngine::from_dir(&dir, &models, ocr_config.clone()).map_err(|e| match e {
            OcrError::ModelLoad(msg) => OcrError::ModelLoad(format!(
                "{} (run 'talipapa models download')",
                msg
            )),
            other => other,
        })
    });

    BatchProcessor::new(LopdfRasterizer::new(config.pdf.clone()), ocr).with_config(config.pdf.clone())
}

/// File name shown for a path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
