//! OCR token extraction.
//!
//! The comparison core does not care which OCR engine produced a token, only
//! that tokens arrive in emission order with pixel bounding boxes and
//! non-empty text. [`TokenExtractor`] is the seam; [`OcrsExtractor`] is the
//! bundled implementation over the `ocrs` engine.

mod ocrs_engine;

pub use ocrs_engine::{OcrModelPaths, OcrsExtractor};

use image::RgbImage;

use crate::error::Result;
use crate::geometry::PixelRect;

/// A single recognized word with its bounding box on the page image.
///
/// Invariant: `text` is never empty or whitespace-only; extractors filter
/// such tokens out before returning.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Recognized text
    pub text: String,
    /// Bounding box in page image pixels
    pub bounds: PixelRect,
}

impl Token {
    /// Create a new token.
    pub fn new(text: impl Into<String>, bounds: PixelRect) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// Extracts the token sequence of one page image.
///
/// Implementations must return tokens in the engine's emission order (which
/// is not guaranteed to be reading order), drop tokens with empty text, and
/// keep every bounding box within the page image. Extraction must be
/// deterministic for a given image and engine version.
pub trait TokenExtractor {
    /// Run recognition over one page image.
    fn extract(&self, page: &RgbImage) -> Result<Vec<Token>>;
}
