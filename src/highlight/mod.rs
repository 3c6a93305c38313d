//! Change overlay rendering.
//!
//! Changed regions are filled solid on a copy of the page, then the copy is
//! alpha-blended back over the original at a fixed opacity, so highlights
//! read as a translucent wash and the text underneath stays legible.

use image::{Rgb, RgbImage};

use crate::config::HighlightStyle;
use crate::ocr::Token;

/// Render a highlighted copy of `image` with every changed token marked.
///
/// Each changed token's box is expanded by `style.padding` per side (top-left
/// clamped at the origin), filled with `style.color` on an overlay copy, and
/// the result is `opacity * overlay + (1 - opacity) * original` per channel.
/// Indices without a corresponding token are skipped; tokens and indices
/// originate from the same extraction, so that path is defensive only. The
/// input image is never mutated.
pub fn highlight_changes(
    image: &RgbImage,
    tokens: &[Token],
    changed: &[usize],
    style: &HighlightStyle,
) -> RgbImage {
    let (width, height) = image.dimensions();
    let fill = Rgb(style.color);

    let mut overlay = image.clone();
    for &index in changed {
        let Some(token) = tokens.get(index) else {
            continue;
        };
        let Some(rect) = token.bounds.expanded(style.padding).clipped_to(width, height) else {
            continue;
        };
        for y in rect.top..rect.bottom() {
            for x in rect.left..rect.right() {
                overlay.put_pixel(x, y, fill);
            }
        }
    }

    let mut blended = RgbImage::new(width, height);
    for (x, y, pixel) in blended.enumerate_pixels_mut() {
        let over = overlay.get_pixel(x, y);
        let base = image.get_pixel(x, y);
        *pixel = Rgb([
            blend(over[0], base[0], style.opacity),
            blend(over[1], base[1], style.opacity),
            blend(over[2], base[2], style.opacity),
        ]);
    }
    blended
}

fn blend(over: u8, base: u8, opacity: f32) -> u8 {
    (over as f32 * opacity + base as f32 * (1.0 - opacity))
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;

    fn white_page(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn token_at(left: u32, top: u32, width: u32, height: u32) -> Token {
        Token::new("word", PixelRect::new(left, top, width, height))
    }

    #[test]
    fn test_no_changes_returns_identical_image() {
        let page = white_page(40, 30);
        let out = highlight_changes(&page, &[token_at(5, 5, 10, 10)], &[], &HighlightStyle::default());
        assert_eq!(out, page);
    }

    #[test]
    fn test_highlight_tints_the_expanded_box() {
        let page = white_page(60, 40);
        let style = HighlightStyle::default();
        let out = highlight_changes(&page, &[token_at(20, 20, 10, 6)], &[0], &style);

        // 0.3 * red + 0.7 * white
        let tinted = Rgb([255, 179, 179]);
        // Inside the original box
        assert_eq!(*out.get_pixel(25, 22), tinted);
        // Inside the padded fringe
        assert_eq!(*out.get_pixel(17, 17), tinted);
        // Just outside the padded box
        assert_eq!(*out.get_pixel(15, 15), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_highlight_clamps_at_image_edges() {
        let page = white_page(20, 20);
        let style = HighlightStyle::default();
        // Box flush against the top-left corner and overhanging bottom-right
        let out = highlight_changes(
            &page,
            &[token_at(0, 0, 8, 8), token_at(16, 16, 10, 10)],
            &[0, 1],
            &style,
        );
        assert_eq!(out.dimensions(), (20, 20));
        // Corner pixels got tinted, nothing panicked at the edges
        assert_ne!(*out.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_ne!(*out.get_pixel(19, 19), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        let page = white_page(30, 30);
        let out = highlight_changes(&page, &[token_at(5, 5, 5, 5)], &[7], &HighlightStyle::default());
        assert_eq!(out, page);
    }

    #[test]
    fn test_input_image_is_not_mutated() {
        let page = white_page(30, 30);
        let before = page.clone();
        let _ = highlight_changes(&page, &[token_at(5, 5, 5, 5)], &[0], &HighlightStyle::default());
        assert_eq!(page, before);
    }

    #[test]
    fn test_blend_arithmetic() {
        assert_eq!(blend(255, 255, 0.3), 255);
        assert_eq!(blend(0, 255, 0.3), 179);
        assert_eq!(blend(255, 0, 0.3), 77);
        assert_eq!(blend(0, 0, 0.3), 0);
    }
}
