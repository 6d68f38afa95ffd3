//! Category Error Types

use thiserror::Error;

/// Errors from category matching and the lexicon behind it
#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("no categories provided to omit")]
    NoOmittedCats,

    #[error("Lexicon lookup failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for category operations
pub type CategoryResult<T> = std::result::Result<T, CategoryError>;
