//! PDF page rasterization.
//!
//! Documents are rendered page by page to RGB rasters at a fixed DPI before
//! OCR. Rendering goes through the external pdfium library; locating that
//! library (system install or a `./` drop-in) is a deployment concern.

use std::path::Path;

use image::RgbImage;
use pdfium_render::prelude::*;

use crate::error::{Error, Result};

/// Produces the ordered page images of one document.
pub trait PageRasterizer {
    /// Render every page of the document at `path`.
    ///
    /// Fails with [`Error::DocumentRead`] when the path is unreadable, not a
    /// valid PDF, or yields zero pages.
    fn rasterize(&self, path: &Path) -> Result<Vec<RgbImage>>;
}

/// [`PageRasterizer`] backed by the pdfium library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
    dpi: u32,
}

impl PdfiumRasterizer {
    /// Bind to pdfium and prepare a rasterizer rendering at `dpi`.
    ///
    /// Tries the system library first, then the platform library name in the
    /// working directory.
    pub fn new(dpi: u32) -> Result<Self> {
        let bindings = Pdfium::bind_to_system_library()
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            })
            .map_err(|e| Error::PdfiumBind(e.to_string()))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            dpi,
        })
    }

    /// The rasterization resolution in dots per inch.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, path: &Path) -> Result<Vec<RgbImage>> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Error::DocumentRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut pages = Vec::new();
        for page in document.pages().iter() {
            // Page sizes are in points; 72 points per inch
            let width_px = (page.width().value * self.dpi as f32 / 72.0).round().max(1.0) as i32;
            let height_px = (page.height().value * self.dpi as f32 / 72.0).round().max(1.0) as i32;
            let bitmap = page
                .render_with_config(&PdfRenderConfig::new().set_target_size(width_px, height_px))
                .map_err(|e| Error::DocumentRead {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            pages.push(bitmap.as_image().to_rgb8());
        }

        if pages.is_empty() {
            return Err(Error::DocumentRead {
                path: path.to_path_buf(),
                reason: "document contains no pages".to_string(),
            });
        }
        log::debug!("rasterized {} pages from {}", pages.len(), path.display());
        Ok(pages)
    }
}
