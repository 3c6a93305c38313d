//! Integration tests for report assembly.

use image::{Rgb, RgbImage};

use ocrdiff::error::Error;
use ocrdiff::report::assemble_report;

#[test]
fn test_report_contains_one_page_per_image() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("page_1_diff.png");
    let second = dir.path().join("page_3_diff.png");
    RgbImage::from_pixel(60, 40, Rgb([255, 200, 200]))
        .save(&first)
        .unwrap();
    RgbImage::from_pixel(40, 80, Rgb([200, 200, 255]))
        .save(&second)
        .unwrap();

    let output = dir.path().join("comparison_report.pdf");
    assemble_report(&[first, second], &output, 90).expect("report assembly");

    assert!(output.exists());
    let doc = lopdf::Document::load(&output).expect("report is a readable PDF");
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_report_rejects_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("comparison_report.pdf");
    let err = assemble_report(&[], &output, 90).unwrap_err();
    assert!(matches!(err, Error::ReportWrite(_)));
    assert!(!output.exists());
}

#[test]
fn test_report_rejects_missing_page_image() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("page_1_diff.png");
    let output = dir.path().join("comparison_report.pdf");
    let err = assemble_report(&[missing], &output, 90).unwrap_err();
    assert!(matches!(err, Error::ReportWrite(_)));
}
