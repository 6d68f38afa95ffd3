/// Tagmap - category vocabulary and link views for a link-sharing service
///
/// Resolves typed categories into ranked, fuzzy-matchable vocabulary and
/// composes filterable, paginated views over link collections.

pub mod config;
pub mod core;
pub mod database;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
