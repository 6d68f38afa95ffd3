//! SQLite Database Module
//!
//! Storage collaborator for links, tags, users and category ranks. Query
//! descriptors built in `core::query` are executed here.

mod lexicon;
mod links;
mod migrations;
mod models;
mod ranks;
mod users;

pub use lexicon::EDIT_COST;
pub use links::LinkOps;
pub use migrations::run_migrations;
pub use models::*;
pub use ranks::{decrement_ranks, increment_ranks, RankOps};
pub use users::UserOps;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::FromRow;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::query::{Query, QueryArg};

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "tagmap.db";

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open (or create) the database in `data_dir` and run migrations
    pub async fn new(data_dir: &Path) -> Result<Self, sqlx::Error> {
        let db_path = data_dir.join(DB_FILE_NAME);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let options =
            SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", db_path.display()))?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .connect_with(options)
            .await?;

        let db = Self {
            pool,
            path: db_path,
        };

        migrations::run_migrations(&db.pool).await?;

        tracing::debug!(path = %db.path().display(), "Database ready");

        Ok(db)
    }

    /// Get the underlying pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Query Descriptor Execution
    // =========================================================================

    /// Execute a descriptor and decode every row.
    pub async fn fetch_all<T>(&self, query: &Query) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&query.text);
        for arg in &query.args {
            q = match arg {
                QueryArg::Text(s) => q.bind(s.as_str()),
                QueryArg::Int(i) => q.bind(*i),
            };
        }

        q.fetch_all(self.pool()).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Query execution failed");
        })
    }

    /// Execute a descriptor expected to yield at most one row.
    pub async fn fetch_optional<T>(&self, query: &Query) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&query.text);
        for arg in &query.args {
            q = match arg {
                QueryArg::Text(s) => q.bind(s.as_str()),
                QueryArg::Int(i) => q.bind(*i),
            };
        }

        q.fetch_optional(self.pool()).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Query execution failed");
        })
    }

    /// Count the rows a descriptor would return.
    pub async fn fetch_count(&self, query: &Query) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM ({})", query.text);
        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for arg in &query.args {
            q = match arg {
                QueryArg::Text(s) => q.bind(s.as_str()),
                QueryArg::Int(i) => q.bind(*i),
            };
        }

        q.fetch_one(self.pool()).await
    }
}
