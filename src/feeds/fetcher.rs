//! Per-source retrieval and record extraction.
//!
//! A source's entries are considered in feed order up to the item cap. An
//! entry is kept when its publication date (from `published`, else
//! `updated`) equals the target date. Entries with no usable date are kept
//! too and stamped with the target date. Titles are trimmed and must exceed
//! [`crate::models::MIN_TITLE_CHARS`] characters.

use super::FeedTransport;
use super::parse::{FeedEntry, parse_feed};
use crate::error::FetchError;
use crate::models::{NewsRecord, Source};
use chrono::NaiveDate;
use tracing::{debug, instrument, trace};

/// Fetches one source at a time through a [`FeedTransport`].
///
/// The per-request timeout is a property of the transport (see
/// [`super::http::HttpTransport::new`]).
#[derive(Debug)]
pub struct FeedFetcher<T> {
    transport: T,
    max_items: usize,
}

impl<T: FeedTransport> FeedFetcher<T> {
    pub fn new(transport: T, max_items: usize) -> Self {
        Self {
            transport,
            max_items,
        }
    }

    /// Fetch `source` and extract the records published on `target_date`.
    ///
    /// # Errors
    ///
    /// Transport and parse failures come back as [`FetchError`]. A feed with
    /// no entries for the day is `Ok` and empty.
    #[instrument(level = "info", skip_all, fields(source = %source.name, target_date = %target_date))]
    pub async fn fetch(
        &self,
        source: &Source,
        target_date: NaiveDate,
    ) -> Result<Vec<NewsRecord>, FetchError> {
        let body = self.transport.get(&source.url).await?;
        let entries = parse_feed(&body)?;
        debug!(entries = entries.len(), "Parsed feed");
        Ok(extract_records(
            entries,
            &source.name,
            target_date,
            self.max_items,
        ))
    }
}

/// Convert parsed entries into records for `target_date`.
pub fn extract_records(
    entries: Vec<FeedEntry>,
    source_name: &str,
    target_date: NaiveDate,
    max_items: usize,
) -> Vec<NewsRecord> {
    entries
        .into_iter()
        .take(max_items)
        .filter_map(|entry| record_from_entry(entry, source_name, target_date))
        .collect()
}

/// The entry's publication date: `published`, falling back to `updated`.
pub fn resolve_date(entry: &FeedEntry) -> Option<NaiveDate> {
    entry
        .published
        .or(entry.updated)
        .map(|ts| ts.date_naive())
}

fn record_from_entry(
    entry: FeedEntry,
    source_name: &str,
    target_date: NaiveDate,
) -> Option<NewsRecord> {
    let date = match resolve_date(&entry) {
        Some(date) if date != target_date => {
            trace!(%date, "Entry outside target date");
            return None;
        }
        Some(date) => date,
        None => target_date,
    };
    let title = entry.title?;
    let link = entry.link.unwrap_or_default();
    NewsRecord::new(&title, &link, source_name, date)
}
