//! Category Rank Store
//!
//! Per-category usage counters behind fuzzy matching. Every update is a
//! single upsert so concurrent link events never lose a count.

use sqlx::SqliteConnection;

use super::Database;

/// Add one use of each category, creating unseen categories.
///
/// Runs on the caller's connection so link lifecycle changes can apply it
/// inside their own transaction.
pub async fn increment_ranks<S: AsRef<str>>(
    conn: &mut SqliteConnection,
    cats: &[S],
) -> Result<(), sqlx::Error> {
    for cat in cats.iter().map(|c| c.as_ref().trim()).filter(|c| !c.is_empty()) {
        sqlx::query(
            r#"
            INSERT INTO category_ranks (word, rank) VALUES (?, 1)
            ON CONFLICT(word) DO UPDATE SET rank = rank + 1
            "#,
        )
        .bind(cat)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Remove one use of each category. Ranks never drop below 0.
pub async fn decrement_ranks<S: AsRef<str>>(
    conn: &mut SqliteConnection,
    cats: &[S],
) -> Result<(), sqlx::Error> {
    for cat in cats.iter().map(|c| c.as_ref().trim()).filter(|c| !c.is_empty()) {
        sqlx::query(
            r#"
            INSERT INTO category_ranks (word, rank) VALUES (?, 0)
            ON CONFLICT(word) DO UPDATE SET rank = MAX(rank - 1, 0)
            "#,
        )
        .bind(cat)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Extension trait for rank store operations
pub trait RankOps {
    fn increment_ranks_for_cats(&self, cats: &[String]) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn decrement_ranks_for_cats(&self, cats: &[String]) -> impl std::future::Future<Output = Result<(), sqlx::Error>> + Send;
    fn get_rank(&self, word: &str) -> impl std::future::Future<Output = Result<Option<i64>, sqlx::Error>> + Send;
}

impl RankOps for Database {
    async fn increment_ranks_for_cats(&self, cats: &[String]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        increment_ranks(&mut *tx, cats).await?;
        tx.commit().await?;

        tracing::debug!(?cats, "Incremented category ranks");
        Ok(())
    }

    async fn decrement_ranks_for_cats(&self, cats: &[String]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool().begin().await?;
        decrement_ranks(&mut *tx, cats).await?;
        tx.commit().await?;

        tracing::debug!(?cats, "Decremented category ranks");
        Ok(())
    }

    async fn get_rank(&self, word: &str) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT rank FROM category_ranks WHERE word = ?")
            .bind(word)
            .fetch_optional(self.pool())
            .await
    }
}
