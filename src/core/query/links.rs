//! Top Links Query
//!
//! Trending links across the whole site, filterable by categories and
//! submission window, paginated in SQL.

use super::{
    push_cats_condition, push_nsfw_condition, push_signed_in_fields, resolve_page,
    DeferredError, NsfwFilter, Period, Query, QueryError, QueryResult, LINK_FIELDS,
    LINKS_PAGE_LIMIT,
};
use crate::core::categories::SearchExpr;

/// Builder for the trending links listing
#[derive(Debug, Clone)]
pub struct TopLinks {
    cats: Option<SearchExpr>,
    period: Option<Period>,
    signed_in_user: Option<String>,
    include_nsfw: bool,
    page: u32,
    error: DeferredError,
}

impl Default for TopLinks {
    fn default() -> Self {
        Self::new()
    }
}

impl TopLinks {
    pub fn new() -> Self {
        Self {
            cats: None,
            period: None,
            signed_in_user: None,
            include_nsfw: false,
            page: 1,
            error: DeferredError::default(),
        }
    }

    /// Only links whose categories match every entry (any spelling variant).
    pub fn from_cats<S: AsRef<str>>(mut self, cats: &[S]) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.cats = SearchExpr::for_categories(cats);
        self
    }

    /// Only links submitted within `period` (`day|week|month|year`).
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

    /// Add whether `user_id` liked / copied each link.
    pub fn as_signed_in_user(mut self, user_id: &str) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.signed_in_user = Some(user_id.to_string());
        self
    }

    /// Keep links tagged NSFW, which are hidden by default.
    pub fn include_nsfw(mut self) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.include_nsfw = true;
        self
    }

    /// 1-based page; 0 means the first page, negatives are an error.
    pub fn page(mut self, page: i64) -> Self {
        if self.error.is_set() {
            return self;
        }
        match resolve_page(page) {
            Ok(page) => self.page = page,
            Err(err) => self.error.record(err),
        }
        self
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.get()
    }

    /// Render the descriptor, or return the first recorded error.
    ///
    /// Fetches one row past the page so callers can tell whether a next
    /// page exists.
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
        query.push("\nFROM links l");

        let nsfw = if self.include_nsfw {
            NsfwFilter::Include
        } else {
            NsfwFilter::Exclude
        };
        self.push_filters(&mut query, nsfw);

        query
            .push("\nORDER BY like_count DESC, summary_count DESC, l.submit_date DESC, l.id ASC")
            .push_bind("\nLIMIT ?", LINKS_PAGE_LIMIT + 1)
            .push_bind(" OFFSET ?", page_offset(self.page));

        Ok(query)
    }

    /// Ids of every NSFW link passing the category and period filters,
    /// ignoring pagination and `include_nsfw`.
    pub fn nsfw_links(self) -> QueryResult<Query> {
        self.error.check()?;

        let mut query = Query::new();
        query.push("SELECT l.id\nFROM links l");
        self.push_filters(&mut query, NsfwFilter::Only);

        Ok(query)
    }

    fn push_filters(&self, query: &mut Query, nsfw: NsfwFilter) {
        let mut first = true;
        if let Some(period) = self.period {
            query.push_condition(&mut first, &period.clause("l.submit_date"));
        }
        if let Some(cats) = &self.cats {
            push_cats_condition(query, &mut first, cats);
        }
        push_nsfw_condition(query, &mut first, "COALESCE(l.global_cats, '')", nsfw);
    }
}

/// Row offset of a 1-based page. Computed in `i64` so no `u32` page overflows.
fn page_offset(page: u32) -> i64 {
    (i64::from(page) - 1) * i64::from(LINKS_PAGE_LIMIT)
}
