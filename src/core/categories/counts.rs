//! Category Counting
//!
//! Counts category occurrences across a materialized item set, merges
//! capitalization variants and drops categories the request filtered on.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::normalize::{fold, same_category, spelling_variants, split_cats};

/// Categories shown alongside a treasure map
pub const TMAP_CATS_PAGE_LIMIT: usize = 12;

/// A category and how many items carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatCount {
    pub category: String,
    pub count: i64,
}

impl CatCount {
    pub fn new(category: impl Into<String>, count: i64) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// Anything with a comma-joined category field.
pub trait HasCats {
    fn cats(&self) -> &str;
}

impl HasCats for String {
    fn cats(&self) -> &str {
        self
    }
}

impl<T: HasCats + ?Sized> HasCats for &T {
    fn cats(&self) -> &str {
        (**self).cats()
    }
}

/// Build the omission set from raw request categories.
///
/// Tokens are lowercased and expanded with their spelling variants, so
/// omitting `flower` also omits `flowers`.
pub fn omission_set(omit_raw: &str) -> HashSet<String> {
    split_cats(omit_raw)
        .flat_map(|cat| spelling_variants(&fold(cat.trim())))
        .collect()
}

/// Count categories across `items`, most frequent first, capped at `limit`.
///
/// Each item contributes at most once per category (case-insensitive).
/// Categories matching `omit_raw` are not counted.
pub fn count_categories<T: HasCats>(items: &[T], omit_raw: &str, limit: usize) -> Vec<CatCount> {
    let omitted = omission_set(omit_raw);

    let mut counts: Vec<CatCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let mut item_cats: HashSet<String> = HashSet::new();

        for cat in split_cats(item.cats()) {
            let folded = fold(cat);
            if omitted.contains(&folded) || !item_cats.insert(folded) {
                continue;
            }

            match index.get(cat) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(cat.to_string(), counts.len());
                    counts.push(CatCount::new(cat, 1));
                }
            }
        }
    }

    counts.sort_by(sort_cats);
    merge_capitalization_variants(&mut counts, &omitted);
    counts.truncate(limit);

    counts
}

/// Count descending, then category ascending.
pub fn sort_cats(a: &CatCount, b: &CatCount) -> std::cmp::Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.category.cmp(&b.category))
}

/// Fold later capitalization variants (e.g. "Music" / "music") into the
/// first one seen. Variants that are themselves omitted stay unmerged.
///
/// The lowercase spelling becomes the display form when one is merged in.
pub fn merge_capitalization_variants(counts: &mut Vec<CatCount>, omitted: &HashSet<String>) {
    let mut i = 0;
    while i < counts.len() {
        let mut j = i + 1;
        while j < counts.len() {
            if same_category(&counts[i].category, &counts[j].category)
                && !omitted.contains(&fold(&counts[j].category))
            {
                let merged = counts.remove(j);
                counts[i].count += merged.count;
                if merged.category == fold(&merged.category) {
                    counts[i].category = merged.category;
                }
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}
