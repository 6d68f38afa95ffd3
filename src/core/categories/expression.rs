//! Search Expression Builder
//!
//! Category filters are assembled as a small AND/OR tree and serialized
//! once, into SQLite FTS5 `MATCH` syntax. Reserved-character escaping
//! happens only at serialization.

use super::normalize::{escape_reserved_chars, spelling_variants};

/// A boolean search expression over category terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchExpr {
    /// A single category token, unescaped
    Term(String),
    /// Any of the children must match
    Or(Vec<SearchExpr>),
    /// All of the children must match
    And(Vec<SearchExpr>),
}

impl SearchExpr {
    /// All spelling variants of one category, as a disjunction.
    pub fn spelling_alternation(token: &str) -> Self {
        SearchExpr::Or(
            spelling_variants(token)
                .into_iter()
                .map(SearchExpr::Term)
                .collect(),
        )
    }

    /// Conjunction of the spelling alternations of every non-blank category.
    ///
    /// Returns `None` when no category survives.
    pub fn for_categories<S: AsRef<str>>(cats: &[S]) -> Option<Self> {
        let alternations: Vec<SearchExpr> = cats
            .iter()
            .map(|cat| cat.as_ref().trim())
            .filter(|cat| !cat.is_empty())
            .map(SearchExpr::spelling_alternation)
            .collect();

        if alternations.is_empty() {
            None
        } else {
            Some(SearchExpr::And(alternations))
        }
    }

    /// Every term in the tree, left to right.
    pub fn terms(&self) -> Vec<&str> {
        match self {
            SearchExpr::Term(term) => vec![term.as_str()],
            SearchExpr::Or(children) | SearchExpr::And(children) => {
                children.iter().flat_map(|child| child.terms()).collect()
            }
        }
    }

    /// Serialize to an FTS5 query string.
    pub fn to_fts5(&self) -> String {
        match self {
            SearchExpr::Term(term) => escape_reserved_chars(term),
            SearchExpr::Or(children) => format!(
                "({})",
                children
                    .iter()
                    .map(SearchExpr::to_fts5)
                    .collect::<Vec<_>>()
                    .join(" OR ")
            ),
            SearchExpr::And(children) => children
                .iter()
                .map(SearchExpr::to_fts5)
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }
}
