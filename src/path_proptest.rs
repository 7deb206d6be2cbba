//! Property-based tests for project path helpers.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{descendant_prefix, encode_url_path, is_nested_under};
    use proptest::prelude::*;

    proptest! {
        /// Property: any name joined to a child segment is nested under it
        #[test]
        fn child_segment_is_nested(parent in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", child in "[a-z]{1,8}") {
            let candidate = format!("{}/{}", parent, child);
            prop_assert!(is_nested_under(&parent, &candidate));
            prop_assert!(candidate.starts_with(&descendant_prefix(&parent)));
        }

        /// Property: appending characters without a separator never nests
        #[test]
        fn sibling_with_shared_prefix_is_not_nested(parent in "[a-z]{1,8}", tail in "[a-z0-9_-]{1,8}") {
            let candidate = format!("{}{}", parent, tail);
            prop_assert!(!is_nested_under(&parent, &candidate));
        }

        /// Property: nesting is irreflexive and antisymmetric
        #[test]
        fn nesting_is_strict(a in "[a-z/]{1,12}", b in "[a-z/]{1,12}") {
            prop_assert!(!is_nested_under(&a, &a));
            prop_assert!(!(is_nested_under(&a, &b) && is_nested_under(&b, &a)));
        }

        /// Property: encode_url_path never produces path separators
        #[test]
        fn encode_url_path_has_no_separators(input in ".*") {
            let result = encode_url_path(&input);
            prop_assert!(!result.contains('/'));
            prop_assert!(!result.contains('\\'));
        }

        /// Property: encode_url_path is deterministic (same input = same output)
        #[test]
        fn encode_url_path_is_deterministic(input in ".*") {
            prop_assert_eq!(encode_url_path(&input), encode_url_path(&input));
        }
    }
}
