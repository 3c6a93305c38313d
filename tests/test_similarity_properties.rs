//! Property tests for token normalization and similarity.

use proptest::prelude::*;

use ocrdiff::config::Sensitivity;
use ocrdiff::matching::{is_similar, match_ratio, normalize};

fn sens(value: f64) -> Sensitivity {
    Sensitivity::try_new(value).expect("threshold in range")
}

proptest! {
    #[test]
    fn prop_similarity_is_symmetric(
        a in "[a-zA-Z0-9 .,-]{0,12}",
        b in "[a-zA-Z0-9 .,-]{0,12}",
        threshold in 0.5f64..=1.0,
    ) {
        prop_assert_eq!(
            is_similar(&a, &b, sens(threshold)),
            is_similar(&b, &a, sens(threshold))
        );
    }

    #[test]
    fn prop_every_string_matches_itself(
        s in "[a-zA-Z0-9 .,-]{0,16}",
        threshold in 0.5f64..=1.0,
    ) {
        // Exact-match short-circuit holds at every threshold
        prop_assert!(is_similar(&s, &s, sens(threshold)));
    }

    #[test]
    fn prop_raising_threshold_only_removes_matches(
        a in "[a-zA-Z0-9]{0,10}",
        b in "[a-zA-Z0-9]{0,10}",
        low in 0.5f64..=1.0,
        high in 0.5f64..=1.0,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        if is_similar(&a, &b, sens(high)) {
            prop_assert!(is_similar(&a, &b, sens(low)));
        }
    }

    #[test]
    fn prop_ratio_is_bounded(
        a in "[a-zA-Z0-9 ]{0,12}",
        b in "[a-zA-Z0-9 ]{0,12}",
    ) {
        let ratio = match_ratio(&normalize(&a), &normalize(&b));
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn prop_normalize_output_is_lowercase_alphanumeric(s in "\\PC{0,20}") {
        let normalized = normalize(&s);
        prop_assert!(normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        // The folded confusables never survive
        prop_assert!(!normalized.contains(['0', '1', '5', '8']));
    }

    #[test]
    fn prop_normalize_is_idempotent(s in "\\PC{0,20}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }
}
