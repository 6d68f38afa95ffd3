//! Link lifecycle operations
//!
//! Link submission, deletion, tagging, likes, copies and summaries. Changes
//! to a link's global categories update the rank store and the category
//! search index in the same transaction.

use sqlx::SqliteConnection;

use super::models::{clean_cats, timestamp_now, NewLink};
use super::ranks::{decrement_ranks, increment_ranks};
use super::Database;

/// Extension trait for link-related database operations
pub trait LinkOps {
    fn create_link(&self, link: &NewLink) -> impl std::future::Future<Output = Result<String, sqlx::Error>> + Send;
    fn delete_link(&self, link_id: &str) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send;
    fn tag_link(&self, link_id: &str, login_name: &str, cats: &str) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn like_link(&self, link_id: &str, user_id: &str) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn copy_link(&self, link_id: &str, user_id: &str) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn add_summary(&self, link_id: &str, login_name: &str, text: &str) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
}

impl LinkOps for Database {
    /// Insert a link with its submitter's tag. Returns the new link ID.
    async fn create_link(&self, link: &NewLink) -> Result<String, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp_now();
        let cats = clean_cats(&link.cats);
        let global_cats = cats.join(",");

        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO links (id, url, submitted_by, submit_date, global_cats, global_summary, img_url)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&link.url)
        .bind(&link.submitted_by)
        .bind(&now)
        .bind(&global_cats)
        .bind(&link.summary)
        .bind(&link.img_url)
        .execute(&mut *tx)
        .await?;

        if !cats.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO tags (id, link_id, cats, submitted_by, last_updated)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&global_cats)
            .bind(&link.submitted_by)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(summary) = &link.summary {
            sqlx::query(
                r#"
                INSERT INTO summaries (id, link_id, submitted_by, text, last_updated)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&link.submitted_by)
            .bind(summary)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        sync_search_index(&mut *tx, &id, &global_cats).await?;
        increment_ranks(&mut *tx, &cats).await?;

        tx.commit().await?;

        tracing::info!(link_id = %id, url = %link.url, cats = %global_cats, "Link created");
        Ok(id)
    }

    /// Delete a link and everything hanging off it. Returns false if the
    /// link did not exist.
    async fn delete_link(&self, link_id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        let global_cats: Option<Option<String>> =
            sqlx::query_scalar("SELECT global_cats FROM links WHERE id = ?")
                .bind(link_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(global_cats) = global_cats else {
            return Ok(false);
        };

        for table in ["tags", "link_likes", "link_copies", "summaries", "global_cats_fts"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE link_id = ?"))
                .bind(link_id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM links WHERE id = ?")
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        let cats = clean_cats(global_cats.as_deref().unwrap_or_default());
        decrement_ranks(&mut *tx, &cats).await?;

        tx.commit().await?;

        tracing::info!(link_id, "Link deleted");
        Ok(true)
    }

    /// Set `login_name`'s tag on a link. A tag by the link's submitter also
    /// replaces the link's global categories.
    async fn tag_link(&self, link_id: &str, login_name: &str, cats: &str) -> Result<(), sqlx::Error> {
        let cats = clean_cats(cats);
        let joined = cats.join(",");
        let now = timestamp_now();

        let mut tx = self.pool().begin().await?;

        let link: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT submitted_by, global_cats FROM links WHERE id = ?")
                .bind(link_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((submitted_by, old_global_cats)) = link else {
            return Err(sqlx::Error::RowNotFound);
        };

        sqlx::query(
            r#"
            INSERT INTO tags (id, link_id, cats, submitted_by, last_updated)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(link_id, submitted_by) DO UPDATE SET
                cats = excluded.cats,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(link_id)
        .bind(&joined)
        .bind(login_name)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        if submitted_by == login_name {
            sqlx::query("UPDATE links SET global_cats = ? WHERE id = ?")
                .bind(&joined)
                .bind(link_id)
                .execute(&mut *tx)
                .await?;

            let old_cats = clean_cats(old_global_cats.as_deref().unwrap_or_default());
            decrement_ranks(&mut *tx, &old_cats).await?;
            increment_ranks(&mut *tx, &cats).await?;
            sync_search_index(&mut *tx, link_id, &joined).await?;
        }

        tx.commit().await?;

        tracing::debug!(link_id, login_name, cats = %joined, "Link tagged");
        Ok(())
    }

    async fn like_link(&self, link_id: &str, user_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO link_likes (id, link_id, user_id) VALUES (?, ?, ?)")
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(link_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn copy_link(&self, link_id: &str, user_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO link_copies (id, link_id, user_id) VALUES (?, ?, ?)")
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(link_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Set `login_name`'s summary; the first summary becomes the link's
    /// global summary.
    async fn add_summary(&self, link_id: &str, login_name: &str, text: &str) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO summaries (id, link_id, submitted_by, text, last_updated)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(link_id, submitted_by) DO UPDATE SET
                text = excluded.text,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(link_id)
        .bind(login_name)
        .bind(text)
        .bind(timestamp_now())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE links SET global_summary = ? WHERE id = ? AND global_summary IS NULL")
            .bind(text)
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Replace a link's row in the category search index.
async fn sync_search_index(
    conn: &mut SqliteConnection,
    link_id: &str,
    global_cats: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM global_cats_fts WHERE link_id = ?")
        .bind(link_id)
        .execute(&mut *conn)
        .await?;

    if !global_cats.is_empty() {
        sqlx::query("INSERT INTO global_cats_fts (link_id, global_cats) VALUES (?, ?)")
            .bind(link_id)
            .bind(global_cats)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
