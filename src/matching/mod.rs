//! Token text normalization and fuzzy similarity.
//!
//! OCR output is noisy: case drifts, punctuation smears, and the engine
//! confuses visually close glyphs. Before two tokens are compared they are
//! normalized to lowercase ASCII alphanumerics with the classic confusable
//! digits folded into their letter lookalikes. Similarity over the normalized
//! strings uses a Ratcliff/Obershelp ratio: twice the total length of the
//! matching blocks found by recursively taking the longest common substring,
//! divided by the combined length of both strings.
//!
//! Everything in this module is pure; [`is_similar`] is called once per token
//! pair, O(n x m) times per page.

use std::collections::HashMap;

use crate::config::Sensitivity;

/// OCR-confusable substitutions, applied in order after filtering.
const CONFUSABLES: [(char, char); 4] = [('0', 'o'), ('1', 'i'), ('5', 's'), ('8', 'b')];

/// Normalize token text for comparison.
///
/// Trims surrounding whitespace, lowercases, strips every character that is
/// not an ASCII lowercase letter or digit, then folds the OCR-confusable
/// digits `0`, `1`, `5`, `8` into `o`, `i`, `s`, `b`.
///
/// # Examples
///
/// ```
/// use ocrdiff::matching::normalize;
///
/// assert_eq!(normalize("  Valve-10 "), "valveio");
/// assert_eq!(normalize("PSI"), "psi");
/// ```
pub fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .map(|c| {
            CONFUSABLES
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Longest matching block between `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, size)` for the longest block, preferring the earliest
/// position in `a` and then in `b` on ties, matching the selection order of
/// the classic sequence-matcher this ratio derives from.
fn longest_match(
    a: &[u8],
    b: &[u8],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    // j2len[j] = length of the longest block ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for j in blo..bhi {
            if b[j] != a[i] {
                continue;
            }
            let k = if j > blo {
                j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
            } else {
                1
            };
            next.insert(j, k);
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        j2len = next;
    }
    (best_i, best_j, best_size)
}

/// Total length of all matching blocks between `a` and `b`.
fn matching_total(a: &[u8], b: &[u8]) -> usize {
    let mut total = 0;
    let mut regions = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        regions.push((alo, i, blo, j));
        regions.push((i + size, ahi, j + size, bhi));
    }
    total
}

/// Similarity ratio of two normalized strings, in `[0.0, 1.0]`.
///
/// Computed as `2 * M / T` where `M` is the total length of the matching
/// blocks and `T` the combined length of both strings. Two empty strings are
/// defined to have ratio 1.0. Inputs are expected to be [`normalize`] output
/// (plain ASCII); the ratio is computed bytewise.
pub fn match_ratio(a: &str, b: &str) -> f64 {
    let combined = a.len() + b.len();
    if combined == 0 {
        return 1.0;
    }
    let matched = matching_total(a.as_bytes(), b.as_bytes());
    2.0 * matched as f64 / combined as f64
}

/// Decide whether two token texts denote the same word under `sensitivity`.
///
/// Normalized equality short-circuits to `true` regardless of the threshold;
/// otherwise the pair is similar iff the match ratio strictly exceeds it.
///
/// # Examples
///
/// ```
/// use ocrdiff::config::Sensitivity;
/// use ocrdiff::matching::is_similar;
///
/// let sensitivity = Sensitivity::try_new(0.75).unwrap();
/// assert!(is_similar("Pressure", "Preasure", sensitivity));
/// assert!(!is_similar("Pressure", "Vacuum", sensitivity));
/// ```
pub fn is_similar(a: &str, b: &str, sensitivity: Sensitivity) -> bool {
    let norm_a = normalize(a);
    let norm_b = normalize(b);
    if norm_a == norm_b {
        return true;
    }
    match_ratio(&norm_a, &norm_b) > sensitivity.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sens(value: f64) -> Sensitivity {
        Sensitivity::try_new(value).expect("test sensitivity in range")
    }

    #[test]
    fn test_normalize_strips_and_lowercases() {
        assert_eq!(normalize("  Hello, World!  "), "helloworld");
        assert_eq!(normalize("A-B_C"), "abc");
        assert_eq!(normalize("Ünïcode"), "ncode");
    }

    #[test]
    fn test_normalize_confusable_substitutions() {
        assert_eq!(normalize("0158"), "oisb");
        assert_eq!(normalize("X100"), "xioo");
        // 2..9 other than 5 and 8 pass through
        assert_eq!(normalize("2374"), "2374");
    }

    #[test]
    fn test_normalize_empty_and_symbol_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_ratio_identical() {
        assert_eq!(match_ratio("abc", "abc"), 1.0);
    }

    #[test]
    fn test_ratio_disjoint() {
        assert_eq!(match_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_ratio_both_empty_is_one() {
        assert_eq!(match_ratio("", ""), 1.0);
    }

    #[test]
    fn test_ratio_one_empty_is_zero() {
        assert_eq!(match_ratio("abc", ""), 0.0);
        assert_eq!(match_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_ratio_known_value() {
        // Blocks: "pre" + "sure" -> M = 7, T = 16
        assert!((match_ratio("preasure", "pressure") - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_exact_match_ignores_threshold() {
        for value in [0.5, 0.75, 0.9, 1.0] {
            assert!(is_similar("Valve", "valve", sens(value)));
            // Equality after normalization, not raw equality
            assert!(is_similar("100", "ioo", sens(value)));
        }
    }

    #[test]
    fn test_similarity_is_strict_at_threshold() {
        // "x2oo" vs "xioo" has ratio exactly 0.75
        let ratio = match_ratio(&normalize("X200"), &normalize("X100"));
        assert!((ratio - 0.75).abs() < 1e-9);
        assert!(!is_similar("X200", "X100", sens(0.75)));
        assert!(is_similar("X200", "X100", sens(0.5)));
    }

    #[test]
    fn test_ocr_noise_scenario() {
        // Typical OCR misspellings stay similar at 0.75
        assert!(is_similar("Pressure", "Preasure", sens(0.75)));
        assert!(is_similar("Gauge", "Gague", sens(0.75)));
    }

    #[test]
    fn test_model_number_scenario() {
        // Close part numbers diverge at 0.9
        assert!(!is_similar("X200", "X100", sens(0.9)));
        assert!(is_similar("Model", "Model", sens(0.9)));
    }

    #[test]
    fn test_symmetry() {
        let pairs = [("Pressure", "Preasure"), ("X200", "X100"), ("a", "b")];
        for (a, b) in pairs {
            for value in [0.5, 0.75, 0.9] {
                assert_eq!(is_similar(a, b, sens(value)), is_similar(b, a, sens(value)));
            }
        }
    }

    #[test]
    fn test_threshold_monotonicity() {
        // Raising the bar only removes matches
        let (a, b) = ("Pressure", "Preasure");
        let mut last = true;
        for value in [0.5, 0.6, 0.7, 0.8, 0.9, 1.0] {
            let now = is_similar(a, b, sens(value));
            assert!(!now || last, "match reappeared at threshold {value}");
            last = now;
        }
    }
}
