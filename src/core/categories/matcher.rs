//! Category Fuzzy Matching
//!
//! Turns a typed snippet into ranked category suggestions. Candidates come
//! from a [`Lexicon`]; ordering is by edit distance first, then by usage
//! rank summed across capitalization variants.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use serde::{Deserialize, Serialize};

use super::error::{CategoryError, CategoryResult};
use super::normalize::fold;

/// Distance ceiling passed to the lexicon (one spellfix edit costs 100)
pub const SPELLFIX_DISTANCE_LIMIT: u32 = 100;
/// Suggestions returned by default
pub const SPELLFIX_MATCHES_LIMIT: usize = 3;
/// Suggestions returned in "more" mode
pub const MORE_SPELLFIX_MATCHES_LIMIT: usize = 10;

/// One candidate word from the lexicon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub word: String,
    pub rank: i64,
    pub distance: u32,
}

/// Approximate string matching over known category words.
pub trait Lexicon {
    /// Words equal to, or prefixed by, `snippet` within `max_distance`.
    ///
    /// A word may be returned more than once (e.g. once as a whole-word
    /// match and once as a prefix match).
    fn lookup(
        &self,
        snippet: &str,
        max_distance: u32,
    ) -> impl Future<Output = CategoryResult<Vec<LexiconEntry>>> + Send;
}

/// A suggested category and its summed rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub word: String,
    pub rank: i64,
}

/// Parameters for one suggestion lookup.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    snippet: String,
    omitted: HashSet<String>,
    limit: usize,
}

impl MatchRequest {
    pub fn new(snippet: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            omitted: HashSet::new(),
            limit: SPELLFIX_MATCHES_LIMIT,
        }
    }

    /// Exclude categories (case-insensitive) from the suggestions.
    ///
    /// An empty list, or one whose first entry is blank, is a usage error.
    pub fn omit_cats<S: AsRef<str>>(mut self, cats: &[S]) -> CategoryResult<Self> {
        match cats.first() {
            Some(first) if !first.as_ref().trim().is_empty() => {}
            _ => return Err(CategoryError::NoOmittedCats),
        }

        self.omitted
            .extend(cats.iter().map(|cat| fold(cat.as_ref().trim())));
        Ok(self)
    }

    /// Raise the result limit.
    pub fn more(mut self) -> Self {
        self.limit = MORE_SPELLFIX_MATCHES_LIMIT;
        self
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Per-lowercase-word accumulator
struct MatchGroup {
    word: String,
    word_rank: i64,
    distance: u32,
    rank: i64,
}

/// Look up `request.snippet` and return the best suggestions.
pub async fn match_categories<L: Lexicon>(
    lexicon: &L,
    request: &MatchRequest,
) -> CategoryResult<Vec<CategoryMatch>> {
    let entries = lexicon
        .lookup(&request.snippet, SPELLFIX_DISTANCE_LIMIT)
        .await?;

    Ok(rank_entries(entries, &request.omitted, request.limit))
}

/// Dedupe, omit, order and truncate raw lexicon candidates.
pub fn rank_entries(
    entries: Vec<LexiconEntry>,
    omitted: &HashSet<String>,
    limit: usize,
) -> Vec<CategoryMatch> {
    // Closest distance per exact word; a word's rank is the same on every row
    let mut by_word: HashMap<String, LexiconEntry> = HashMap::new();
    for entry in entries {
        if entry.distance > SPELLFIX_DISTANCE_LIMIT {
            continue;
        }
        match by_word.get_mut(&entry.word) {
            Some(best) if best.distance <= entry.distance => {}
            Some(best) => *best = entry,
            None => {
                by_word.insert(entry.word.clone(), entry);
            }
        }
    }

    let mut groups: HashMap<String, MatchGroup> = HashMap::new();
    for entry in by_word.into_values() {
        let key = fold(&entry.word);
        if omitted.contains(&key) {
            continue;
        }

        match groups.get_mut(&key) {
            Some(group) => {
                group.rank += entry.rank;
                group.distance = group.distance.min(entry.distance);
                if prefer_display(&entry, group) {
                    group.word = entry.word;
                    group.word_rank = entry.rank;
                }
            }
            None => {
                groups.insert(
                    key,
                    MatchGroup {
                        word: entry.word,
                        word_rank: entry.rank,
                        distance: entry.distance,
                        rank: entry.rank,
                    },
                );
            }
        }
    }

    let mut groups: Vec<MatchGroup> = groups.into_values().collect();
    groups.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| b.rank.cmp(&a.rank))
            .then_with(|| a.word.cmp(&b.word))
    });
    groups.truncate(limit);

    groups
        .into_iter()
        .map(|group| CategoryMatch {
            word: group.word,
            rank: group.rank,
        })
        .collect()
}

/// Lowercase spelling wins; otherwise the more used variant.
fn prefer_display(candidate: &LexiconEntry, current: &MatchGroup) -> bool {
    let candidate_lower = candidate.word == fold(&candidate.word);
    let current_lower = current.word == fold(&current.word);
    if candidate_lower != current_lower {
        return candidate_lower;
    }

    candidate.rank > current.word_rank
        || (candidate.rank == current.word_rank && candidate.word < current.word)
}
