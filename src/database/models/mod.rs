//! Database Models
//!
//! Row types decoded from link, tag and user queries.

mod links;
mod tags;
mod users;

pub use links::{clean_cats, LinkRecord, NewLink};
pub use tags::{TagRanking, TagRankingDetailed};
pub use users::UserRecord;

/// Timestamp format stored in every date column (UTC, second precision).
///
/// Sorts lexically and is understood by SQLite's date functions.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current time in [`TIMESTAMP_FORMAT`]
pub fn timestamp_now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
