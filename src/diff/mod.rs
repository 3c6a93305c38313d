//! Per-page change detection.
//!
//! A modified-page token is "changed" when no token anywhere on the original
//! page is similar to it. Matching is position-blind by contract: text that
//! merely moved or reordered never flags, and the search is a plain all-pairs
//! scan. Token counts per page are small (tens to low hundreds), so the
//! O(n x m) cost is acceptable and not worth an index.

use crate::config::Sensitivity;
use crate::matching::is_similar;
use crate::ocr::Token;

/// Indices of modified-page tokens with no similar original-page token.
///
/// Returned in ascending order. An empty original page flags every modified
/// token; an empty modified page yields an empty change set.
///
/// # Examples
///
/// ```
/// use ocrdiff::config::Sensitivity;
/// use ocrdiff::diff::changed_indices;
/// use ocrdiff::geometry::PixelRect;
/// use ocrdiff::ocr::Token;
///
/// let bounds = PixelRect::new(0, 0, 10, 10);
/// let original = vec![Token::new("Model", bounds), Token::new("X100", bounds)];
/// let modified = vec![Token::new("Model", bounds), Token::new("X200", bounds)];
/// let sensitivity = Sensitivity::try_new(0.9).unwrap();
/// assert_eq!(changed_indices(&original, &modified, sensitivity), vec![1]);
/// ```
pub fn changed_indices(
    original: &[Token],
    modified: &[Token],
    sensitivity: Sensitivity,
) -> Vec<usize> {
    modified
        .iter()
        .enumerate()
        .filter(|(_, modified_token)| {
            !original
                .iter()
                .any(|original_token| is_similar(&modified_token.text, &original_token.text, sensitivity))
        })
        .map(|(index, _)| index)
        .collect()
}
