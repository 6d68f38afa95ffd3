//! Property-based tests for category counting
//!
//! Tests invariants:
//! - Without omissions, no two results are case variants of each other
//! - Omitted categories never appear
//! - No count exceeds the number of items
//! - Results never exceed the page limit

use std::collections::HashSet;

use proptest::prelude::*;

use crate::core::categories::counts::omission_set;
use crate::core::categories::{count_categories, fold, TMAP_CATS_PAGE_LIMIT};

// ============================================================================
// Strategies
// ============================================================================

/// A category from a small vocabulary with random capitalization
fn arb_category() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["music", "flower", "flowers", "test", "coding", "rust"]),
        prop::collection::vec(any::<bool>(), 7),
    )
        .prop_map(|(word, upper)| {
            word.chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect::<String>()
        })
}

/// A comma-joined category field, possibly with blank tokens
fn arb_item() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![4 => arb_category(), 1 => Just(String::new())], 0..6)
        .prop_map(|cats| cats.join(","))
}

proptest! {
    /// Property: case variants always merge when nothing is omitted
    #[test]
    fn prop_no_case_duplicates_without_omissions(
        items in prop::collection::vec(arb_item(), 0..30)
    ) {
        let counts = count_categories(&items, "", usize::MAX);

        let mut seen = HashSet::new();
        for count in &counts {
            prop_assert!(
                seen.insert(fold(&count.category)),
                "duplicate case variant {} in {:?}", count.category, counts
            );
        }
    }

    /// Property: omitted categories never appear in the result
    #[test]
    fn prop_omitted_never_counted(
        items in prop::collection::vec(arb_item(), 0..30),
        omit in prop::collection::vec(arb_category(), 1..3)
    ) {
        let omit_raw = omit.join(",");
        let omitted = omission_set(&omit_raw);
        let counts = count_categories(&items, &omit_raw, usize::MAX);

        for count in &counts {
            prop_assert!(
                !omitted.contains(&fold(&count.category)),
                "{} should have been omitted by {}", count.category, omit_raw
            );
        }
    }

    /// Property: an item contributes at most once to a category
    #[test]
    fn prop_count_bounded_by_items(
        items in prop::collection::vec(arb_item(), 0..30)
    ) {
        let counts = count_categories(&items, "", usize::MAX);

        for count in &counts {
            prop_assert!(count.count >= 1);
            prop_assert!(
                count.count as usize <= items.len(),
                "{} counted {} times across {} items", count.category, count.count, items.len()
            );
        }
    }

    /// Property: the page limit is respected
    #[test]
    fn prop_respects_limit(
        items in prop::collection::vec(arb_item(), 0..30),
        limit in 0usize..=TMAP_CATS_PAGE_LIMIT
    ) {
        let counts = count_categories(&items, "", limit);
        prop_assert!(counts.len() <= limit);
    }
}
