//! Category Vocabulary
//!
//! Text normalization, search-expression building, in-memory category
//! counting and fuzzy category suggestions.

pub mod counts;
pub mod error;
pub mod expression;
pub mod matcher;
pub mod normalize;

pub use counts::{count_categories, CatCount, HasCats, TMAP_CATS_PAGE_LIMIT};
pub use error::{CategoryError, CategoryResult};
pub use expression::SearchExpr;
pub use matcher::{
    match_categories, CategoryMatch, Lexicon, LexiconEntry, MatchRequest,
    MORE_SPELLFIX_MATCHES_LIMIT, SPELLFIX_DISTANCE_LIMIT, SPELLFIX_MATCHES_LIMIT,
};
pub use normalize::{
    escape_reserved_chars, fold, plural_singular_alternation, same_category, spelling_variants,
    split_cats,
};
