//! Category and Tag Queries
//!
//! Global category leaderboard, per-link tag rankings and the single-link
//! tag page.

use super::{
    push_cats_condition, push_signed_in_fields, DeferredError, Period, Query, QueryArg,
    QueryError, QueryResult, LINK_FIELDS,
};
use crate::core::categories::{fold, spelling_variants, SearchExpr};

/// Categories on the global leaderboard
pub const GLOBAL_CATS_PAGE_LIMIT: u32 = 20;
/// Categories on the global leaderboard in "more" mode
pub const MORE_GLOBAL_CATS_PAGE_LIMIT: u32 = 100;
/// Tag rankings shown per link
pub const TAG_RANKINGS_PAGE_LIMIT: u32 = 20;

/// Builder for the global category leaderboard.
///
/// Categories are split out of every link's `global_cats`, grouped
/// case-insensitively and displayed in their lowercase spelling when one
/// exists.
#[derive(Debug, Clone, Default)]
pub struct GlobalCatCounts {
    cats: Vec<String>,
    period: Option<Period>,
    more: bool,
    error: DeferredError,
}

impl GlobalCatCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count only categories that co-occur with all of `cats`, excluding
    /// `cats` themselves.
    pub fn subcats_of_cats<S: AsRef<str>>(mut self, cats: &[S]) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.cats = cats
            .iter()
            .map(|cat| cat.as_ref().trim())
            .filter(|cat| !cat.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn during_period(mut self, period: &str) -> Self {
        if self.error.is_set() {
            return self;
        }
        match period.parse::<Period>() {
            Ok(period) => self.period = Some(period),
            Err(err) => self.error.record(err),
        }
        self
    }

    pub fn more(mut self) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.more = true;
        self
    }

    pub fn limit(&self) -> u32 {
        if self.more {
            MORE_GLOBAL_CATS_PAGE_LIMIT
        } else {
            GLOBAL_CATS_PAGE_LIMIT
        }
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.get()
    }

    pub fn build(self) -> QueryResult<Query> {
        self.error.check()?;

        let mut query = Query::new();
        query.push(
            "WITH RECURSIVE split(id, cat, rest) AS (
    SELECT l.id, '', COALESCE(l.global_cats, '') || ','
    FROM links l",
        );
        if let Some(period) = self.period {
            query.push("\n    WHERE ").push(&period.clause("l.submit_date"));
        }
        query.push(
            "
    UNION ALL
    SELECT
        id,
        TRIM(substr(rest, 1, instr(rest, ',') - 1)),
        substr(rest, instr(rest, ',') + 1)
    FROM split
    WHERE rest != ''
),
cats AS (
    SELECT DISTINCT id, cat FROM split WHERE cat != ''
),
preferred AS (
    SELECT
        id,
        FIRST_VALUE(cat) OVER (
            PARTITION BY LOWER(cat)
            ORDER BY cat = LOWER(cat) DESC, cat ASC
        ) AS category,
        LOWER(cat) AS folded
    FROM cats
)
SELECT category, COUNT(DISTINCT id) AS count
FROM preferred l",
        );

        let mut first = true;
        if let Some(expr) = SearchExpr::for_categories(&self.cats) {
            let omitted: Vec<String> = self
                .cats
                .iter()
                .flat_map(|cat| spelling_variants(&fold(cat)))
                .collect();
            let placeholders = vec!["?"; omitted.len()].join(", ");
            query.push_condition(&mut first, &format!("l.folded NOT IN ({placeholders})"));
            query
                .args
                .extend(omitted.into_iter().map(QueryArg::Text));

            // push_cats_condition filters on `l.id`
            push_cats_condition(&mut query, &mut first, &expr);
        }

        let limit = self.limit();
        query
            .push("\nGROUP BY category\nORDER BY count DESC, category ASC")
            .push_bind("\nLIMIT ?", limit);

        Ok(query)
    }
}

/// Builder for the tag rankings of one link.
///
/// `lifespan_overlap` is how much of the link's life a tag has held, as a
/// percentage; tags unchanged since submission score 100.
#[derive(Debug, Clone)]
pub struct TagRankings {
    link_id: String,
    detailed: bool,
    error: DeferredError,
}

impl TagRankings {
    pub fn new(link_id: &str) -> Self {
        let mut error = DeferredError::default();
        if link_id.trim().is_empty() {
            error.record(QueryError::NoLinkId);
        }

        Self {
            link_id: link_id.to_string(),
            detailed: false,
            error,
        }
    }

    /// Include who submitted each tag and when it last changed.
    pub fn detailed(mut self) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.detailed = true;
        self
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.get()
    }

    pub fn build(self) -> QueryResult<Query> {
        self.error.check()?;

        let mut query = Query::new();
        query.push(
            "SELECT
    COALESCE(
        (julianday('now') - julianday(t.last_updated))
            / (julianday('now') - julianday(l.submit_date)) * 100,
        100.0
    ) AS lifespan_overlap,
    t.cats",
        );
        if self.detailed {
            query.push(",\n    t.submitted_by,\n    t.last_updated");
        }
        query
            .push("\nFROM tags t\nINNER JOIN links l ON l.id = t.link_id")
            .push_bind("\nWHERE t.link_id = ?", self.link_id.as_str())
            .push("\nORDER BY lifespan_overlap DESC")
            .push_bind("\nLIMIT ?", TAG_RANKINGS_PAGE_LIMIT);

        Ok(query)
    }
}

/// Builder for the link shown on a tag page.
#[derive(Debug, Clone)]
pub struct TagPageLink {
    link_id: String,
    signed_in_user: Option<String>,
    error: DeferredError,
}

impl TagPageLink {
    pub fn new(link_id: &str) -> Self {
        let mut error = DeferredError::default();
        if link_id.trim().is_empty() {
            error.record(QueryError::NoLinkId);
        }

        Self {
            link_id: link_id.to_string(),
            signed_in_user: None,
            error,
        }
    }

    pub fn as_signed_in_user(mut self, user_id: &str) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.signed_in_user = Some(user_id.to_string());
        self
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.get()
    }

    pub fn build(self) -> QueryResult<Query> {
        self.error.check()?;

        let mut query = Query::new();
        query
            .push("SELECT")
            .push(LINK_FIELDS)
            .push(",\n    COALESCE(l.global_cats, '') AS cats");
        if let Some(user_id) = &self.signed_in_user {
            push_signed_in_fields(&mut query, user_id);
        }
        query
            .push("\nFROM links l")
            .push_bind("\nWHERE l.id = ?", self.link_id.as_str());

        Ok(query)
    }
}
