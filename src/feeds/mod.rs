//! Feed retrieval: transport, parsing and per-source record extraction.
//!
//! Each source goes through three steps:
//!
//! 1. **Transport** ([`http`]): GET the feed URL under a timeout
//! 2. **Parsing** ([`parse`]): turn the body into [`parse::FeedEntry`] values
//! 3. **Extraction** ([`fetcher`]): cap, date-filter and convert entries into
//!    [`crate::models::NewsRecord`]s
//!
//! The transport sits behind the [`FeedTransport`] trait so the scheduler and
//! fetcher can be exercised against scripted in-memory feeds.

pub mod fetcher;
pub mod http;
pub mod parse;

use crate::error::FetchError;

/// Anything that can turn a feed URL into its raw body.
pub trait FeedTransport {
    /// Fetch the body at `url`, classifying failures as [`FetchError`]s.
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

