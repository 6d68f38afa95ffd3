//! View Error Types

use thiserror::Error;

use crate::core::categories::CategoryError;
use crate::core::query::QueryError;

/// Errors from assembling a view
#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("no user with login name {0}")]
    UnknownOwner(String),
}

/// Result type alias for view assembly
pub type ViewResult<T> = std::result::Result<T, ViewError>;
