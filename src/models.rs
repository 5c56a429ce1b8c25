//! Data models shared by every stage of the digest pipeline.
//!
//! - [`Source`]: One configured feed (name + URL)
//! - [`NewsRecord`]: A headline that survived date and length filtering
//! - [`Category`]: The fixed, ordered topic enumeration used for grouping
//!
//! Every value here is created fresh per run and never mutated after
//! construction; stages hand ownership forward rather than sharing it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Headlines with this many characters or fewer are discarded.
pub const MIN_TITLE_CHARS: usize = 5;

/// A configured feed.
///
/// Identity is `name`: two sources with the same name are rejected when the
/// configuration is validated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Human readable label, used in diagnostics and in the rendered report.
    pub name: String,
    /// Feed URL (RSS, Atom or JSON Feed).
    pub url: String,
}

impl Source {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// A single headline accepted from a feed.
///
/// Built only through [`NewsRecord::new`], which enforces the title length
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsRecord {
    /// Trimmed headline text.
    pub title: String,
    /// Link to the story; empty when the feed entry carried none.
    pub url: String,
    /// Name of the [`Source`] the record came from.
    pub source: String,
    /// Publication date, or the target date for entries that carried none.
    pub date: NaiveDate,
}

impl NewsRecord {
    /// Create a record, returning `None` when the trimmed title is too short.
    pub fn new(title: &str, url: &str, source: &str, date: NaiveDate) -> Option<Self> {
        let title = title.trim();
        if !title_is_long_enough(title) {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            url: url.trim().to_string(),
            source: source.to_string(),
            date,
        })
    }
}

/// True when `title` has more than [`MIN_TITLE_CHARS`] characters.
pub fn title_is_long_enough(title: &str) -> bool {
    title.chars().count() > MIN_TITLE_CHARS
}

/// Topic assigned to a record.
///
/// Declaration order is display order, and `Ord` follows it, so a
/// `BTreeMap<Category, _>` iterates in display order. [`Category::Other`] is
/// the fallback and always sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ai,
    Tech,
    Finance,
    Education,
    Policy,
    Entertainment,
    International,
    Society,
    Sports,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 10] = [
        Category::Ai,
        Category::Tech,
        Category::Finance,
        Category::Education,
        Category::Policy,
        Category::Entertainment,
        Category::International,
        Category::Society,
        Category::Sports,
        Category::Other,
    ];

    /// Categories consulted by keyword matching, highest priority first.
    pub fn prioritized() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| !c.is_fallback())
    }

    pub fn is_fallback(self) -> bool {
        self == Category::Other
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::Tech => "Tech",
            Category::Finance => "Finance",
            Category::Education => "Education",
            Category::Policy => "Policy",
            Category::Entertainment => "Entertainment",
            Category::International => "International",
            Category::Society => "Society",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    #[test]
    fn test_record_trims_title_and_url() {
        let record = NewsRecord::new("  Markets rally again \n", " https://example.com/a ", "NPR", day())
            .unwrap();
        assert_eq!(record.title, "Markets rally again");
        assert_eq!(record.url, "https://example.com/a");
        assert_eq!(record.source, "NPR");
    }

    #[test]
    fn test_record_title_length_boundary() {
        assert!(NewsRecord::new("abcde", "", "src", day()).is_none());
        assert!(NewsRecord::new("abcdef", "", "src", day()).is_some());
        assert!(NewsRecord::new("   abcde   ", "", "src", day()).is_none());
        assert!(NewsRecord::new("", "", "src", day()).is_none());
    }

    #[test]
    fn test_title_length_counts_characters_not_bytes() {
        // Five ideographs are fifteen bytes but still too short.
        assert!(!title_is_long_enough("人工智能新"));
        assert!(title_is_long_enough("人工智能新闻"));
    }

    #[test]
    fn test_category_order_puts_fallback_last() {
        assert_eq!(Category::ALL.last(), Some(&Category::Other));
        assert!(Category::Ai < Category::Tech);
        assert!(Category::Sports < Category::Other);
        assert!(Category::prioritized().all(|c| c != Category::Other));
        assert_eq!(Category::prioritized().count(), 9);
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&Category::Ai).unwrap();
        assert_eq!(json, "\"ai\"");
        let back: Category = serde_json::from_str("\"international\"").unwrap();
        assert_eq!(back, Category::International);
    }
}
