//! Tag Ranking Records

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tag on a link and how long it has held, as a share of the link's life
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagRanking {
    pub lifespan_overlap: f64,
    pub cats: String,
}

/// [`TagRanking`] plus who submitted the tag and when it last changed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TagRankingDetailed {
    pub lifespan_overlap: f64,
    pub cats: String,
    pub submitted_by: String,
    pub last_updated: String,
}
