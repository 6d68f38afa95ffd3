//! Query Builder Error Types

use thiserror::Error;

/// Invalid builder input, recorded on the builder and surfaced by `build()`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid period: {0} (expected day, week, month or year)")]
    InvalidPeriod(String),

    #[error("invalid section: {0} (expected submitted, copied or tagged)")]
    InvalidSection(String),

    #[error("invalid page: {0}")]
    InvalidPage(i64),

    #[error("no login name provided for treasure map owner")]
    NoTmapOwner,

    #[error("no link ID provided")]
    NoLinkId,
}

/// Result type alias for query building
pub type QueryResult<T> = std::result::Result<T, QueryError>;
