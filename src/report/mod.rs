//! Multi-page PDF report assembly.
//!
//! Each highlighted page image becomes one PDF page: the raster is re-encoded
//! as JPEG and embedded as a DCTDecode image XObject painted across a page
//! whose media box matches the pixel dimensions in points. Pages appear in
//! the order the paths are given, which the orchestrator keeps ascending by
//! page number.

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::{Error, Result};

/// Combine the given page images into a single PDF at `output`.
///
/// Fails with [`Error::ReportWrite`] when `image_paths` is empty (the caller
/// must only invoke this when at least one page had changes) or when any
/// input image cannot be read.
pub fn assemble_report(image_paths: &[PathBuf], output: &Path, jpeg_quality: u8) -> Result<()> {
    if image_paths.is_empty() {
        return Err(Error::ReportWrite(
            "no page images to assemble into a report".to_string(),
        ));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for path in image_paths {
        let image = image::open(path)
            .map_err(|e| Error::ReportWrite(format!("failed to read '{}': {e}", path.display())))?
            .to_rgb8();
        let (width, height) = image.dimensions();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, jpeg_quality)
            .encode_image(&image)
            .map_err(|e| Error::ReportWrite(format!("failed to encode '{}': {e}", path.display())))?;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        // Paint the image across the whole page
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        (width as i64).into(),
                        0.into(),
                        0.into(),
                        (height as i64).into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content
                .encode()
                .map_err(|e| Error::ReportWrite(format!("failed to encode page content: {e}")))?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => Object::Reference(image_id),
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(output)
        .map_err(|e| Error::ReportWrite(format!("failed to write '{}': {e}", output.display())))?;
    log::debug!("wrote {page_count}-page report to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_rejected() {
        let err = assemble_report(&[], Path::new("unused.pdf"), 90).unwrap_err();
        assert!(matches!(err, Error::ReportWrite(_)));
    }

    #[test]
    fn test_unreadable_image_is_rejected() {
        let missing = vec![PathBuf::from("no_such_page_diff.png")];
        let err = assemble_report(&missing, Path::new("unused.pdf"), 90).unwrap_err();
        assert!(matches!(err, Error::ReportWrite(_)));
    }
}
