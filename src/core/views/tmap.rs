//! Treasure Map View
//!
//! A user's links split into submitted / copied / tagged sections, with the
//! categories counted across whatever the filters left. Counting needs every
//! matching link, so sections are paginated here rather than in SQL.

use serde::{Deserialize, Serialize};

use super::{parse_cats, ViewError, ViewResult};
use crate::core::categories::{count_categories, CatCount, TMAP_CATS_PAGE_LIMIT};
use crate::core::query::{resolve_page, QueryError, Section, TmapSection, LINKS_PAGE_LIMIT};
use crate::database::{Database, LinkRecord, UserOps};

/// Request options for a treasure map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmapOptions {
    pub owner_login_name: String,
    /// Comma-joined category filter, as sent by the client
    pub raw_cats: String,
    pub period: Option<String>,
    pub signed_in_user: Option<String>,
    /// Show links the owner's categories mark NSFW
    pub include_nsfw: bool,
    pub sort_by_newest: bool,
    /// Restrict to one section (`submitted|copied|tagged`)
    pub section: Option<String>,
    pub page: i64,
}

/// One page of a single section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmapSectionPage {
    pub links: Vec<LinkRecord>,
    pub cats: Vec<CatCount>,
    pub next_page: Option<u32>,
    /// NSFW links in the section matching the filters, shown or not
    pub nsfw_links_count: i64,
}

/// The first page of every section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmapSections {
    pub submitted: Vec<LinkRecord>,
    pub copied: Vec<LinkRecord>,
    pub tagged: Vec<LinkRecord>,
    /// Sections truncated to the page limit
    pub sections_with_more: Vec<String>,
    pub cats: Vec<CatCount>,
    /// NSFW links across all sections matching the filters
    pub nsfw_links_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreasureMap {
    Section(TmapSectionPage),
    Sections(TmapSections),
}

/// Build a treasure map for `opts.owner_login_name`.
pub async fn build_tmap(db: &Database, opts: &TmapOptions) -> ViewResult<TreasureMap> {
    let owner = opts.owner_login_name.trim();
    if owner.is_empty() {
        return Err(QueryError::NoTmapOwner.into());
    }
    let section = opts
        .section
        .as_deref()
        .map(str::parse::<Section>)
        .transpose()?;
    let page = resolve_page(opts.page)?;

    if !db.user_exists(owner).await? {
        tracing::warn!(owner, "Treasure map requested for unknown user");
        return Err(ViewError::UnknownOwner(owner.to_string()));
    }

    match section {
        Some(section) => {
            let (links, nsfw_links_count) = fetch_section(db, section, opts).await?;
            let cats = count_categories(&links, &opts.raw_cats, TMAP_CATS_PAGE_LIMIT);
            let (links, next_page) = paginate_section(links, page);

            tracing::debug!(owner, %section, page, links = links.len(), "Treasure map section built");

            Ok(TreasureMap::Section(TmapSectionPage {
                links,
                cats,
                next_page,
                nsfw_links_count,
            }))
        }
        None => {
            let (mut submitted, submitted_nsfw) = fetch_section(db, Section::Submitted, opts).await?;
            let (mut copied, copied_nsfw) = fetch_section(db, Section::Copied, opts).await?;
            let (mut tagged, tagged_nsfw) = fetch_section(db, Section::Tagged, opts).await?;
            // Sections are disjoint, so the per-section counts add up
            let nsfw_links_count = submitted_nsfw + copied_nsfw + tagged_nsfw;

            let all: Vec<&LinkRecord> = submitted.iter().chain(&copied).chain(&tagged).collect();
            let cats = count_categories(&all, &opts.raw_cats, TMAP_CATS_PAGE_LIMIT);

            let limit = LINKS_PAGE_LIMIT as usize;
            let mut sections_with_more = Vec::new();
            for (section, links) in [
                (Section::Submitted, &mut submitted),
                (Section::Copied, &mut copied),
                (Section::Tagged, &mut tagged),
            ] {
                if links.len() > limit {
                    sections_with_more.push(section.to_string());
                    links.truncate(limit);
                }
            }

            tracing::debug!(owner, ?sections_with_more, nsfw_links_count, "Treasure map built");

            Ok(TreasureMap::Sections(TmapSections {
                submitted,
                copied,
                tagged,
                sections_with_more,
                cats,
                nsfw_links_count,
            }))
        }
    }
}

/// A section's links and its count of matching NSFW links.
async fn fetch_section(
    db: &Database,
    section: Section,
    opts: &TmapOptions,
) -> ViewResult<(Vec<LinkRecord>, i64)> {
    let mut builder =
        TmapSection::new(section, opts.owner_login_name.trim()).from_cats(&parse_cats(&opts.raw_cats));
    if let Some(period) = &opts.period {
        builder = builder.during_period(period);
    }
    if let Some(user_id) = &opts.signed_in_user {
        builder = builder.as_signed_in_user(user_id);
    }
    if opts.include_nsfw {
        builder = builder.include_nsfw();
    }
    if opts.sort_by_newest {
        builder = builder.sort_by_newest();
    }

    let links = db.fetch_all(&builder.clone().build()?).await?;
    let nsfw_links_count = db.fetch_count(&builder.nsfw_links()?).await?;

    Ok((links, nsfw_links_count))
}

/// Slice one page out of a fully materialized section.
///
/// Pages past the end are empty; only pages before the last report a next
/// page.
pub fn paginate_section<T>(links: Vec<T>, page: u32) -> (Vec<T>, Option<u32>) {
    let limit = LINKS_PAGE_LIMIT as usize;
    let page = page.max(1) as usize;
    let total_pages = links.len().div_ceil(limit);

    if page > total_pages {
        (Vec::new(), None)
    } else if page == total_pages {
        (links.into_iter().skip(limit * (page - 1)).collect(), None)
    } else {
        let next = u32::try_from(page + 1).ok();
        (links.into_iter().skip(limit * (page - 1)).take(limit).collect(), next)
    }
}
