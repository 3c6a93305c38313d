//! Configuration for comparison runs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest accepted sensitivity.
pub const MIN_SENSITIVITY: f64 = 0.5;
/// Highest accepted sensitivity.
pub const MAX_SENSITIVITY: f64 = 1.0;

/// Similarity cutoff for token matching, in `[0.5, 1.0]`.
///
/// Higher values are stricter: more tokens are flagged as changed. The value
/// is supplied once per comparison run and applied uniformly to every
/// token-pair comparison in that run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitivity(f64);

impl Sensitivity {
    /// Validate a raw value, rejecting anything outside `[0.5, 1.0]`.
    pub fn try_new(value: f64) -> Result<Self> {
        if !(MIN_SENSITIVITY..=MAX_SENSITIVITY).contains(&value) {
            return Err(Error::InvalidSensitivity(value));
        }
        Ok(Self(value))
    }

    /// Saturate a raw value into the supported range.
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY))
    }

    /// The threshold as a plain float.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(0.75)
    }
}

/// Appearance of the change overlay drawn on modified pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// Pixels added on every side of a token box before filling
    pub padding: u32,
    /// Fill color as RGB
    pub color: [u8; 3],
    /// Overlay opacity in `[0.0, 1.0]`
    pub opacity: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            padding: 4,
            color: [255, 0, 0],
            opacity: 0.3,
        }
    }
}

/// Options governing a comparison run.
///
/// Everything here is fixed for the lifetime of a run; the per-run inputs
/// (paths, sensitivity) travel in [`crate::compare::CompareJob`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Rasterization resolution in dots per inch
    pub dpi: u32,
    /// Change overlay appearance
    pub highlight: HighlightStyle,
    /// JPEG quality (1-100) used when embedding page images in the report
    pub report_jpeg_quality: u8,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            highlight: HighlightStyle::default(),
            report_jpeg_quality: 90,
        }
    }
}

impl CompareOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rasterization DPI.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the highlight appearance.
    pub fn with_highlight(mut self, style: HighlightStyle) -> Self {
        self.highlight = style;
        self
    }

    /// Set the report JPEG quality.
    pub fn with_report_jpeg_quality(mut self, quality: u8) -> Self {
        self.report_jpeg_quality = quality;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_accepts_range_bounds() {
        assert!(Sensitivity::try_new(0.5).is_ok());
        assert!(Sensitivity::try_new(1.0).is_ok());
        assert!(Sensitivity::try_new(0.75).is_ok());
    }

    #[test]
    fn test_sensitivity_rejects_out_of_range() {
        assert!(Sensitivity::try_new(0.49).is_err());
        assert!(Sensitivity::try_new(1.01).is_err());
        assert!(Sensitivity::try_new(f64::NAN).is_err());
    }

    #[test]
    fn test_sensitivity_clamps() {
        assert_eq!(Sensitivity::clamped(0.2).value(), 0.5);
        assert_eq!(Sensitivity::clamped(7.0).value(), 1.0);
        assert_eq!(Sensitivity::clamped(0.8).value(), 0.8);
    }

    #[test]
    fn test_options_defaults() {
        let options = CompareOptions::default();
        assert_eq!(options.dpi, 300);
        assert_eq!(options.highlight.padding, 4);
        assert_eq!(options.highlight.color, [255, 0, 0]);
        assert!((options.highlight.opacity - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_options_from_json_overrides() {
        let options: CompareOptions =
            serde_json::from_str(r#"{"dpi": 150, "highlight": {"padding": 2}}"#)
                .expect("valid options json");
        assert_eq!(options.dpi, 150);
        assert_eq!(options.highlight.padding, 2);
        // Unspecified fields keep their defaults
        assert_eq!(options.highlight.color, [255, 0, 0]);
        assert_eq!(options.report_jpeg_quality, 90);
    }
}
