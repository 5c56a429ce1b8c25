//! Feed body parsing.
//!
//! `feed-rs` handles RSS 0.9x/1.0/2.0, Atom and JSON Feed; this module only
//! narrows its model down to the fields the digest cares about.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use chrono::{DateTime, Utc};

/// One entry from a parsed feed. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Parse a feed body into entries, in feed order.
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>, FetchError> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| FetchError::Malformed(truncate_for_log(&e.to_string(), 120)))?;
    Ok(feed.entries.into_iter().map(FeedEntry::from).collect())
}

impl From<feed_rs::model::Entry> for FeedEntry {
    fn from(entry: feed_rs::model::Entry) -> Self {
        Self {
            title: entry.title.map(|t| t.content),
            link: story_link(&entry.links),
            published: entry.published,
            updated: entry.updated,
        }
    }
}

/// The entry's story URL: the first alternate (or rel-less) link, else the
/// first link with any href at all.
fn story_link(links: &[feed_rs::model::Link]) -> Option<String> {
    links
        .iter()
        .filter(|l| !l.href.trim().is_empty())
        .find(|l| {
            let rel = l.rel.as_deref().unwrap_or("");
            rel.is_empty() || rel.eq_ignore_ascii_case("alternate")
        })
        .or_else(|| links.iter().find(|l| !l.href.trim().is_empty()))
        .map(|l| l.href.trim().to_string())
}
