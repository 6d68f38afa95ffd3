//! Property-based tests for category normalization
//!
//! Tests invariants:
//! - Spelling variants lead with the token and are distinct
//! - Alternations are parenthesized and contain the escaped token
//! - Escaping adds exactly two quotes per reserved character

use proptest::prelude::*;

use crate::core::categories::normalize::RESERVED_CHARS;
use crate::core::categories::{
    escape_reserved_chars, fold, plural_singular_alternation, same_category, spelling_variants,
};

proptest! {
    #[test]
    fn prop_variants_lead_with_token(token in "[a-zA-Z0-9]{1,12}") {
        let variants = spelling_variants(&token);

        prop_assert_eq!(&variants[0], &token);
        prop_assert!(variants.len() >= 2);
        for (i, a) in variants.iter().enumerate() {
            for b in &variants[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn prop_alternation_shape(token in "[a-z.#@-]{1,12}") {
        let alternation = plural_singular_alternation(&token);
        let escaped = escape_reserved_chars(&token);

        prop_assert!(alternation.starts_with('('));
        prop_assert!(alternation.ends_with(')'));
        let expected_prefix = format!("({escaped} OR ");
        prop_assert!(alternation.starts_with(&expected_prefix));
    }

    #[test]
    fn prop_escape_quotes_reserved_only(token in ".{0,24}") {
        let reserved = token.chars().filter(|c| RESERVED_CHARS.contains(c)).count();
        let escaped = escape_reserved_chars(&token);

        prop_assert_eq!(escaped.chars().count(), token.chars().count() + 2 * reserved);
        prop_assert_eq!(escaped.replace('"', ""), token.replace('"', ""));
    }

    #[test]
    fn prop_fold_identity(token in "[a-zA-ZÀ-ÿ]{0,16}") {
        prop_assert!(same_category(&token, &fold(&token)));
        prop_assert_eq!(fold(&fold(&token)), fold(&token));
    }
}
