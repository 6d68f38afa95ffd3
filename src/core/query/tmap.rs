//! Treasure Map Section Queries
//!
//! One builder per section of a user's treasure map:
//! - submitted: links the owner submitted
//! - copied: links the owner copied from someone else
//! - tagged: links the owner tagged but neither submitted nor copied
//!
//! Sections are not paginated in SQL; category counts need the whole
//! filtered section first.

use super::{
    push_cats_condition, push_nsfw_condition, push_signed_in_fields, DeferredError, NsfwFilter,
    Period, Query, QueryError, QueryResult, Section, LINK_FIELDS,
};
use crate::core::categories::SearchExpr;

/// Builder for one treasure map section
#[derive(Debug, Clone)]
pub struct TmapSection {
    section: Section,
    owner: String,
    cats: Option<SearchExpr>,
    period: Option<Period>,
    signed_in_user: Option<String>,
    include_nsfw: bool,
    sort_by_newest: bool,
    error: DeferredError,
}

impl TmapSection {
    pub fn new(section: Section, owner_login_name: &str) -> Self {
        let mut error = DeferredError::default();
        if owner_login_name.trim().is_empty() {
            error.record(QueryError::NoTmapOwner);
        }

        Self {
            section,
            owner: owner_login_name.to_string(),
            cats: None,
            period: None,
            signed_in_user: None,
            include_nsfw: false,
            sort_by_newest: false,
            error,
        }
    }

    pub fn submitted(owner_login_name: &str) -> Self {
        Self::new(Section::Submitted, owner_login_name)
    }

    pub fn copied(owner_login_name: &str) -> Self {
        Self::new(Section::Copied, owner_login_name)
    }

    pub fn tagged(owner_login_name: &str) -> Self {
        Self::new(Section::Tagged, owner_login_name)
    }

    pub fn from_cats<S: AsRef<str>>(mut self, cats: &[S]) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.cats = SearchExpr::for_categories(cats);
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

    pub fn as_signed_in_user(mut self, user_id: &str) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.signed_in_user = Some(user_id.to_string());
        self
    }

    /// Keep links whose categories in this section include NSFW.
    pub fn include_nsfw(mut self) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.include_nsfw = true;
        self
    }

    /// Newest first instead of most liked first.
    pub fn sort_by_newest(mut self) -> Self {
        if self.error.is_set() {
            return self;
        }
        self.sort_by_newest = true;
        self
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.get()
    }

    pub fn build(self) -> QueryResult<Query> {
        self.error.check()?;

        let mut query = Query::new();
        query.push("SELECT").push(LINK_FIELDS).push(
            ",
    COALESCE(t.cats, l.global_cats, '') AS cats,
    (t.cats IS NOT NULL) AS cats_from_user",
        );
        if let Some(user_id) = &self.signed_in_user {
            push_signed_in_fields(&mut query, user_id);
        }
        let nsfw = if self.include_nsfw {
            NsfwFilter::Include
        } else {
            NsfwFilter::Exclude
        };
        self.push_from_and_filters(&mut query, nsfw);

        if self.sort_by_newest {
            query.push("\nORDER BY l.submit_date DESC, like_count DESC, l.id ASC");
        } else {
            query.push("\nORDER BY like_count DESC, l.submit_date DESC, l.id ASC");
        }

        Ok(query)
    }

    /// Ids of the section's NSFW links passing the category and period
    /// filters, whatever `include_nsfw` says.
    pub fn nsfw_links(self) -> QueryResult<Query> {
        self.error.check()?;

        let mut query = Query::new();
        query.push("SELECT l.id");
        self.push_from_and_filters(&mut query, NsfwFilter::Only);

        Ok(query)
    }

    fn push_from_and_filters(&self, query: &mut Query, nsfw: NsfwFilter) {
        query.push("\nFROM links l");

        let mut first = true;
        match self.section {
            Section::Submitted => {
                query.push_bind(
                    "\nLEFT JOIN tags t ON t.link_id = l.id AND t.submitted_by = ?",
                    self.owner.as_str(),
                );
                query.push_condition(&mut first, "l.submitted_by = ?");
            }
            Section::Copied => {
                query.push(
                    "
INNER JOIN link_copies c ON c.link_id = l.id
INNER JOIN users u ON u.id = c.user_id
LEFT JOIN tags t ON t.link_id = l.id AND t.submitted_by = u.login_name",
                );
                query.push_condition(&mut first, "u.login_name = ?");
                query.push("\nAND l.submitted_by != u.login_name");
            }
            Section::Tagged => {
                query.push("\nINNER JOIN tags t ON t.link_id = l.id");
                query.push_condition(&mut first, "t.submitted_by = ?");
                query.push(
                    "
AND l.submitted_by != t.submitted_by
AND l.id NOT IN (
    SELECT c.link_id
    FROM link_copies c
    INNER JOIN users u ON u.id = c.user_id
    WHERE u.login_name = t.submitted_by
)",
                );
            }
        }
        query.args.push(self.owner.as_str().into());

        if let Some(period) = self.period {
            query.push_condition(&mut first, &period.clause("l.submit_date"));
        }
        if let Some(cats) = &self.cats {
            push_cats_condition(query, &mut first, cats);
        }
        // A user's own tag overrides the global categories in their map
        push_nsfw_condition(query, &mut first, "COALESCE(t.cats, l.global_cats, '')", nsfw);
    }
}
