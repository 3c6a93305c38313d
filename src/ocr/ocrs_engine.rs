//! Token extraction backed by the `ocrs` engine.
//!
//! The engine needs two rten model files (text detection and text
//! recognition). Obtaining them is a deployment concern; this module only
//! resolves where to look: explicit paths, then the `OCRDIFF_DETECTION_MODEL`
//! / `OCRDIFF_RECOGNITION_MODEL` environment variables, then the user cache
//! directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use ocrs::{DecodeMethod, ImageSource, OcrEngine, OcrEngineParams, TextItem};
use rten::Model;

use crate::error::{Error, Result};
use crate::geometry::PixelRect;

use super::{Token, TokenExtractor};

const DETECTION_ENV: &str = "OCRDIFF_DETECTION_MODEL";
const RECOGNITION_ENV: &str = "OCRDIFF_RECOGNITION_MODEL";
const DETECTION_FILE: &str = "text-detection.rten";
const RECOGNITION_FILE: &str = "text-recognition.rten";

/// Locations of the rten model files the OCR engine runs on.
#[derive(Debug, Clone)]
pub struct OcrModelPaths {
    /// Text detection model
    pub detection: PathBuf,
    /// Text recognition model
    pub recognition: PathBuf,
}

impl OcrModelPaths {
    /// Resolve model locations from explicit paths, environment variables,
    /// or the `ocrdiff/ocr` subdirectory of the user cache directory, in
    /// that order per model.
    pub fn resolve(detection: Option<PathBuf>, recognition: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            detection: resolve_one(detection, DETECTION_ENV, DETECTION_FILE)?,
            recognition: resolve_one(recognition, RECOGNITION_ENV, RECOGNITION_FILE)?,
        })
    }
}

fn resolve_one(explicit: Option<PathBuf>, env_var: &str, file_name: &str) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env::var_os(env_var) {
        return Ok(PathBuf::from(path));
    }
    let cache = dirs::cache_dir()
        .ok_or_else(|| Error::Ocr("no cache directory to locate OCR models in".to_string()))?;
    Ok(cache.join("ocrdiff").join("ocr").join(file_name))
}

/// Token extractor over the pure-Rust `ocrs` OCR engine.
pub struct OcrsExtractor {
    engine: OcrEngine,
}

impl OcrsExtractor {
    /// Load the models and construct the engine.
    pub fn new(models: &OcrModelPaths) -> Result<Self> {
        let detection_model = load_model(&models.detection)?;
        let recognition_model = load_model(&models.recognition)?;
        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            alphabet: None,
            decode_method: DecodeMethod::Greedy,
            debug: false,
        })
        .map_err(|e| Error::Ocr(format!("engine construction failed: {e}")))?;
        Ok(Self { engine })
    }
}

fn load_model(path: &Path) -> Result<Model> {
    let data = fs::read(path)
        .map_err(|e| Error::Ocr(format!("failed to read model '{}': {e}", path.display())))?;
    Model::load(data).map_err(|e| Error::Ocr(format!("failed to load model '{}': {e}", path.display())))
}

impl TokenExtractor for OcrsExtractor {
    fn extract(&self, page: &RgbImage) -> Result<Vec<Token>> {
        let source = ImageSource::from_bytes(page.as_raw(), page.dimensions())
            .map_err(|e| Error::Ocr(e.to_string()))?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| Error::Ocr(e.to_string()))?;
        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|e| Error::Ocr(e.to_string()))?;
        let lines = self.engine.find_text_lines(&input, &word_rects);
        let recognized = self
            .engine
            .recognize_text(&input, &lines)
            .map_err(|e| Error::Ocr(e.to_string()))?;

        let (page_width, page_height) = page.dimensions();
        let mut tokens = Vec::new();
        for line in recognized.into_iter().flatten() {
            for word in line.words() {
                let text = word.to_string();
                if text.trim().is_empty() {
                    continue;
                }
                if let Some(bounds) = pixel_bounds(word.rotated_rect().corners(), page_width, page_height)
                {
                    tokens.push(Token::new(text, bounds));
                }
            }
        }
        log::debug!(
            "OCR recognized {} tokens on a {}x{} page",
            tokens.len(),
            page_width,
            page_height
        );
        Ok(tokens)
    }
}

/// Axis-aligned integer bounds of a detected word, clamped to the page.
fn pixel_bounds(
    corners: [rten_imageproc::PointF; 4],
    page_width: u32,
    page_height: u32,
) -> Option<PixelRect> {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for corner in corners {
        min_x = min_x.min(corner.x);
        min_y = min_y.min(corner.y);
        max_x = max_x.max(corner.x);
        max_y = max_y.max(corner.y);
    }
    let left = min_x.max(0.0).round() as u32;
    let top = min_y.max(0.0).round() as u32;
    let right = (max_x.round() as i64).clamp(0, page_width as i64) as u32;
    let bottom = (max_y.round() as i64).clamp(0, page_height as i64) as u32;
    if right <= left || bottom <= top {
        return None;
    }
    Some(PixelRect::new(left, top, right - left, bottom - top))
}
