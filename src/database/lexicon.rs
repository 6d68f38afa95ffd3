//! Category Lexicon
//!
//! Approximate matching over `category_ranks`. Distances follow spellfix
//! conventions: one edit costs [`EDIT_COST`].

use crate::core::categories::{fold, CategoryResult, Lexicon, LexiconEntry};

use super::Database;

/// Distance of a single insertion, deletion or substitution
pub const EDIT_COST: u32 = 100;

impl Lexicon for Database {
    async fn lookup(&self, snippet: &str, max_distance: u32) -> CategoryResult<Vec<LexiconEntry>> {
        let words: Vec<(String, i64)> =
            sqlx::query_as("SELECT word, rank FROM category_ranks WHERE word != ''")
                .fetch_all(self.pool())
                .await?;

        let entries = candidates(snippet, &words, max_distance);

        tracing::debug!(
            snippet,
            candidates = entries.len(),
            words = words.len(),
            "Lexicon lookup"
        );

        Ok(entries)
    }
}

/// Whole-word and prefix candidates for `snippet` within `max_distance`.
fn candidates(snippet: &str, words: &[(String, i64)], max_distance: u32) -> Vec<LexiconEntry> {
    let needle = fold(snippet.trim());
    let needle_len = needle.chars().count();
    let mut entries = Vec::new();

    for (word, rank) in words {
        let folded = fold(word);

        let whole = distance(&needle, &folded);
        if whole <= max_distance {
            entries.push(LexiconEntry {
                word: word.clone(),
                rank: *rank,
                distance: whole,
            });
        }

        let prefix: String = folded.chars().take(needle_len).collect();
        if prefix != folded {
            let partial = distance(&needle, &prefix);
            if partial <= max_distance {
                entries.push(LexiconEntry {
                    word: word.clone(),
                    rank: *rank,
                    distance: partial,
                });
            }
        }
    }

    entries
}

fn distance(a: &str, b: &str) -> u32 {
    let edits = u32::try_from(strsim::levenshtein(a, b)).unwrap_or(u32::MAX / EDIT_COST);
    edits.saturating_mul(EDIT_COST)
}
