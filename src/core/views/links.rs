//! Trending Links View

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{parse_cats, ViewResult};
use crate::core::categories::{fold, spelling_variants, split_cats, HasCats};
use crate::core::query::{TopLinks, LINKS_PAGE_LIMIT};
use crate::database::{Database, LinkRecord};

/// Request options for the trending links page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinksPageOptions {
    /// Comma-joined category filter
    pub cats: String,
    pub period: Option<String>,
    pub signed_in_user: Option<String>,
    /// Show links tagged NSFW
    pub nsfw: bool,
    pub page: i64,
}

/// One page of trending links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksPage {
    pub links: Vec<LinkRecord>,
    pub next_page: Option<u32>,
    /// Spellings of the requested categories the filter also matched
    pub merged_cats: Vec<String>,
    /// NSFW links matching the filters, shown or not
    pub nsfw_links: i64,
}

/// Fetch a page of trending links.
pub async fn links_page(db: &Database, opts: &LinksPageOptions) -> ViewResult<LinksPage> {
    let cats = parse_cats(&opts.cats);

    let mut builder = TopLinks::new().from_cats(&cats).page(opts.page);
    if let Some(period) = &opts.period {
        builder = builder.during_period(period);
    }
    if let Some(user_id) = &opts.signed_in_user {
        builder = builder.as_signed_in_user(user_id);
    }
    if opts.nsfw {
        builder = builder.include_nsfw();
    }
    let page = builder.current_page();
    let nsfw_query = builder.clone().nsfw_links()?;
    let query = builder.build()?;

    let links: Vec<LinkRecord> = db.fetch_all(&query).await?;
    let nsfw_links = db.fetch_count(&nsfw_query).await?;
    let (links, next_page) = paginate_links(links, page);
    let merged_cats = merged_spelling_variants(&links, &cats);

    tracing::debug!(
        page,
        links = links.len(),
        has_next = next_page.is_some(),
        nsfw_links,
        "Links page fetched"
    );

    Ok(LinksPage {
        links,
        next_page,
        merged_cats,
        nsfw_links,
    })
}

/// Trim a result fetched with one extra row and report the next page.
pub fn paginate_links<T>(mut links: Vec<T>, page: u32) -> (Vec<T>, Option<u32>) {
    let limit = LINKS_PAGE_LIMIT as usize;
    if links.len() > limit {
        links.truncate(limit);
        (links, page.checked_add(1))
    } else {
        (links, None)
    }
}

/// Categories on `items` that are plural/singular spellings of a requested
/// category without being the requested category itself.
pub fn merged_spelling_variants<T: HasCats>(items: &[T], requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        return Vec::new();
    }

    let requested_folded: HashSet<String> = requested.iter().map(|cat| fold(cat)).collect();
    let variants: HashSet<String> = requested_folded
        .iter()
        .flat_map(|cat| spelling_variants(cat))
        .filter(|variant| !requested_folded.contains(variant))
        .collect();

    let mut merged: Vec<String> = Vec::new();
    for item in items {
        for cat in split_cats(item.cats()).map(str::trim) {
            let folded = fold(cat);
            if variants.contains(&folded) && !merged.iter().any(|seen| fold(seen) == folded) {
                merged.push(cat.to_string());
            }
        }
    }

    merged
}
