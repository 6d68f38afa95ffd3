//! Core Module
//!
//! Category vocabulary, query composition and view assembly.

pub mod categories;
pub mod logging;
pub mod query;
pub mod views;
