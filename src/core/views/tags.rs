//! Category and Tag Views

use serde::{Deserialize, Serialize};

use super::{parse_cats, ViewResult};
use crate::core::categories::{match_categories, CatCount, CategoryMatch, Lexicon, MatchRequest};
use crate::core::query::{GlobalCatCounts, TagPageLink, TagRankings};
use crate::database::{Database, LinkRecord, TagRanking, TagRankingDetailed};

/// Request options for the global category leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalCatsOptions {
    /// Comma-joined categories; when set, only their subcategories count
    pub cats: String,
    pub period: Option<String>,
    pub more: bool,
}

/// Most used categories across all links.
pub async fn global_cat_counts(db: &Database, opts: &GlobalCatsOptions) -> ViewResult<Vec<CatCount>> {
    let mut builder = GlobalCatCounts::new().subcats_of_cats(&parse_cats(&opts.cats));
    if let Some(period) = &opts.period {
        builder = builder.during_period(period);
    }
    if opts.more {
        builder = builder.more();
    }

    let counts: Vec<CatCount> = db.fetch_all(&builder.build()?).await?;
    tracing::debug!(cats = %opts.cats, count = counts.len(), "Global category counts fetched");

    Ok(counts)
}

/// Tags on a link, longest held first.
pub async fn tag_rankings(db: &Database, link_id: &str) -> ViewResult<Vec<TagRanking>> {
    let query = TagRankings::new(link_id).build()?;
    Ok(db.fetch_all(&query).await?)
}

/// [`tag_rankings`] with submitters and timestamps.
pub async fn detailed_tag_rankings(db: &Database, link_id: &str) -> ViewResult<Vec<TagRankingDetailed>> {
    let query = TagRankings::new(link_id).detailed().build()?;
    Ok(db.fetch_all(&query).await?)
}

/// The link a tag page is about, if it exists.
pub async fn tag_page_link(
    db: &Database,
    link_id: &str,
    signed_in_user: Option<&str>,
) -> ViewResult<Option<LinkRecord>> {
    let mut builder = TagPageLink::new(link_id);
    if let Some(user_id) = signed_in_user {
        builder = builder.as_signed_in_user(user_id);
    }

    Ok(db.fetch_optional(&builder.build()?).await?)
}

/// Autocomplete suggestions for a typed category snippet.
///
/// `omit`, when given, must name at least one category.
pub async fn suggest_categories<L: Lexicon>(
    lexicon: &L,
    snippet: &str,
    omit: Option<&[String]>,
    more: bool,
) -> ViewResult<Vec<CategoryMatch>> {
    let mut request = MatchRequest::new(snippet);
    if let Some(omit) = omit {
        request = request.omit_cats(omit)?;
    }
    if more {
        request = request.more();
    }

    let matches = match_categories(lexicon, &request).await?;
    tracing::debug!(snippet, matches = matches.len(), "Category suggestions");

    Ok(matches)
}
