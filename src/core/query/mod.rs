//! Query Composition
//!
//! Fluent builders that assemble parameterized SQL descriptors for the link
//! views. Builders never fail mid-chain: the first invalid input is recorded
//! and returned by the terminal `build()`.

pub mod error;
pub mod links;
pub mod tags;
pub mod tmap;

use std::fmt;
use std::str::FromStr;

pub use error::{QueryError, QueryResult};
pub use links::TopLinks;
pub use tags::{GlobalCatCounts, TagPageLink, TagRankings};
pub use tmap::TmapSection;

use crate::core::categories::SearchExpr;

/// Links per page for every link listing
pub const LINKS_PAGE_LIMIT: u32 = 20;

/// Category marking a link as not safe for work
pub const NSFW_CAT: &str = "nsfw";

/// How a listing treats links carrying the NSFW category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NsfwFilter {
    #[default]
    Exclude,
    Include,
    Only,
}

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Text(String),
    Int(i64),
}

impl From<&str> for QueryArg {
    fn from(value: &str) -> Self {
        QueryArg::Text(value.to_string())
    }
}

impl From<String> for QueryArg {
    fn from(value: String) -> Self {
        QueryArg::Text(value)
    }
}

impl From<i64> for QueryArg {
    fn from(value: i64) -> Self {
        QueryArg::Int(value)
    }
}

impl From<u32> for QueryArg {
    fn from(value: u32) -> Self {
        QueryArg::Int(value as i64)
    }
}

/// SQL text plus positional arguments, ready for the storage layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub text: String,
    pub args: Vec<QueryArg>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append SQL text.
    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        self.text.push_str(sql);
        self
    }

    /// Append SQL text containing exactly one `?`, and its argument.
    pub(crate) fn push_bind(&mut self, sql: &str, arg: impl Into<QueryArg>) -> &mut Self {
        self.text.push_str(sql);
        self.args.push(arg.into());
        self
    }

    /// Append a `WHERE`/`AND` condition.
    pub(crate) fn push_condition(&mut self, first: &mut bool, sql: &str) -> &mut Self {
        self.text.push_str(if *first { "\nWHERE " } else { "\nAND " });
        *first = false;
        self.push(sql)
    }
}

/// First-error-wins slot shared by every builder.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeferredError(Option<QueryError>);

impl DeferredError {
    /// Record `err` unless an earlier error is already held.
    pub(crate) fn record(&mut self, err: QueryError) {
        if self.0.is_none() {
            self.0 = Some(err);
        }
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn get(&self) -> Option<&QueryError> {
        self.0.as_ref()
    }

    pub(crate) fn check(&self) -> QueryResult<()> {
        match &self.0 {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Time window over link submission dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn days(self) -> u32 {
        match self {
            Period::Day => 1,
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 365,
        }
    }

    /// SQL condition restricting `column` to this window.
    pub fn clause(self, column: &str) -> String {
        format!("{column} >= date('now', '-{} days')", self.days())
    }
}

impl FromStr for Period {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(QueryError::InvalidPeriod(other.to_string())),
        }
    }
}

/// One of the three treasure map sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Submitted,
    Copied,
    Tagged,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Submitted, Section::Copied, Section::Tagged];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Submitted => "submitted",
            Section::Copied => "copied",
            Section::Tagged => "tagged",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Section::Submitted),
            "copied" => Ok(Section::Copied),
            "tagged" => Ok(Section::Tagged),
            other => Err(QueryError::InvalidSection(other.to_string())),
        }
    }
}

/// Validate a 1-based page number: 0 means page 1, negatives are invalid.
pub fn resolve_page(page: i64) -> QueryResult<u32> {
    match page {
        p if p < 0 => Err(QueryError::InvalidPage(p)),
        0 => Ok(1),
        p => u32::try_from(p).map_err(|_| QueryError::InvalidPage(p)),
    }
}

/// Link columns shared by every link listing.
pub(crate) const LINK_FIELDS: &str = "
    l.id,
    l.url,
    l.submitted_by,
    l.submit_date,
    COALESCE(l.global_summary, '') AS summary,
    (SELECT COUNT(*) FROM summaries s WHERE s.link_id = l.id) AS summary_count,
    (SELECT COUNT(*) FROM link_likes lk WHERE lk.link_id = l.id) AS like_count,
    (SELECT COUNT(*) FROM link_copies lc WHERE lc.link_id = l.id) AS copy_count,
    (SELECT COUNT(*) FROM tags tg WHERE tg.link_id = l.id) AS tag_count,
    COALESCE(l.img_url, '') AS img_url";

/// Append the "liked / copied by this user" projections.
pub(crate) fn push_signed_in_fields(query: &mut Query, user_id: &str) {
    query
        .push_bind(
            ",
    EXISTS(SELECT 1 FROM link_likes ul WHERE ul.link_id = l.id AND ul.user_id = ?) AS is_liked",
            user_id,
        )
        .push_bind(
            ",
    EXISTS(SELECT 1 FROM link_copies uc WHERE uc.link_id = l.id AND uc.user_id = ?) AS is_copied",
            user_id,
        );
}

/// Condition applying `filter` to the comma-joined categories in `cats_expr`.
///
/// Stored categories are trimmed, so the NSFW category is matched as a whole
/// comma-delimited token.
pub(crate) fn push_nsfw_condition(
    query: &mut Query,
    first: &mut bool,
    cats_expr: &str,
    filter: NsfwFilter,
) {
    let op = match filter {
        NsfwFilter::Include => return,
        NsfwFilter::Exclude => "NOT LIKE",
        NsfwFilter::Only => "LIKE",
    };
    query.push_condition(
        first,
        &format!("(',' || LOWER({cats_expr}) || ',') {op} '%,{NSFW_CAT},%'"),
    );
}

/// Condition restricting `l.id` to links whose global categories match.
pub(crate) fn push_cats_condition(query: &mut Query, first: &mut bool, cats: &SearchExpr) {
    query.push_condition(
        first,
        "l.id IN (SELECT link_id FROM global_cats_fts WHERE global_cats MATCH ?)",
    );
    query.args.push(QueryArg::Text(cats.to_fts5()));
}
