//! Link Views
//!
//! Executes query descriptors against the database and assembles the
//! results the request layer renders: paginated link lists, treasure maps,
//! category leaderboards, tag rankings and category suggestions.

pub mod error;
pub mod links;
pub mod tags;
pub mod tmap;

pub use error::{ViewError, ViewResult};
pub use links::{links_page, merged_spelling_variants, paginate_links, LinksPage, LinksPageOptions};
pub use tags::{
    detailed_tag_rankings, global_cat_counts, suggest_categories, tag_page_link, tag_rankings,
    GlobalCatsOptions,
};
pub use tmap::{
    build_tmap, paginate_section, TmapOptions, TmapSectionPage, TmapSections, TreasureMap,
};

use crate::core::categories::split_cats;

/// Split a raw comma-joined category parameter into trimmed tokens.
pub fn parse_cats(raw: &str) -> Vec<String> {
    split_cats(raw).map(|cat| cat.trim().to_string()).collect()
}
