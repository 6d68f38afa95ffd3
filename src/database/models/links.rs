//! Link Records

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::categories::{same_category, split_cats, HasCats};

/// A link row as returned by every link listing.
///
/// `cats` is the link's global categories, or in treasure map sections the
/// owner's own tag when one exists (`cats_from_user`). The signed-in fields
/// are absent unless the query was built for a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkRecord {
    pub id: String,
    pub url: String,
    pub submitted_by: String,
    pub submit_date: String,
    pub summary: String,
    pub summary_count: i64,
    pub like_count: i64,
    pub copy_count: i64,
    pub tag_count: i64,
    pub img_url: String,
    pub cats: String,
    #[sqlx(default)]
    #[serde(default)]
    pub cats_from_user: bool,
    #[sqlx(default)]
    #[serde(default)]
    pub is_liked: bool,
    #[sqlx(default)]
    #[serde(default)]
    pub is_copied: bool,
}

impl HasCats for LinkRecord {
    fn cats(&self) -> &str {
        &self.cats
    }
}

/// Input for a new link submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLink {
    pub url: String,
    pub submitted_by: String,
    /// Comma-joined categories
    pub cats: String,
    pub summary: Option<String>,
    pub img_url: Option<String>,
}

impl NewLink {
    pub fn new(url: impl Into<String>, submitted_by: impl Into<String>, cats: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            submitted_by: submitted_by.into(),
            cats: cats.into(),
            summary: None,
            img_url: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_img_url(mut self, img_url: impl Into<String>) -> Self {
        self.img_url = Some(img_url.into());
        self
    }
}

/// Trim and dedupe (case-insensitively) a comma-joined category field,
/// keeping the first spelling of each category.
pub fn clean_cats(raw: &str) -> Vec<String> {
    let mut cats: Vec<String> = Vec::new();
    for cat in split_cats(raw).map(str::trim) {
        if !cats.iter().any(|seen| same_category(seen, cat)) {
            cats.push(cat.to_string());
        }
    }
    cats
}
