//! Deduplication and category grouping.
//!
//! Titles are compared after trimming and lower-casing; the first record with
//! a given normalized title wins. Survivors are classified and appended to
//! their category bucket in encounter order. Buckets are never re-sorted.

use crate::categorize::Categorizer;
use crate::models::{Category, NewsRecord, title_is_long_enough};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// Records grouped by category.
///
/// Only non-empty buckets are present. Iteration always follows the
/// [`Category`] display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewsByCategory(BTreeMap<Category, Vec<NewsRecord>>);

impl NewsByCategory {
    pub fn get(&self, category: Category) -> Option<&[NewsRecord]> {
        self.0.get(&category).map(Vec::as_slice)
    }

    pub fn count(&self, category: Category) -> usize {
        self.0.get(&category).map_or(0, Vec::len)
    }

    /// Non-empty buckets in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[NewsRecord])> {
        self.0.iter().map(|(c, records)| (*c, records.as_slice()))
    }

    fn push(&mut self, category: Category, record: NewsRecord) {
        self.0.entry(category).or_default().push(record);
    }
}

/// The pipeline's output, handed to the renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub target_date: NaiveDate,
    /// Deduplicated records in encounter order.
    pub unique: Vec<NewsRecord>,
    pub by_category: NewsByCategory,
}

impl Digest {
    /// Dedupe `records` and group the survivors.
    #[instrument(level = "info", skip_all, fields(input = records.len()))]
    pub fn build(
        records: Vec<NewsRecord>,
        categorizer: &Categorizer,
        target_date: NaiveDate,
    ) -> Self {
        let unique = dedupe(records);
        let mut by_category = NewsByCategory::default();
        for record in &unique {
            by_category.push(categorizer.categorize(&record.title), record.clone());
        }
        debug!(unique = unique.len(), categories = by_category.0.len(), "Built digest");
        Self {
            target_date,
            unique,
            by_category,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unique.is_empty()
    }
}

/// Normalized form used for duplicate detection.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Keep the first record for each normalized title.
pub fn dedupe(records: Vec<NewsRecord>) -> Vec<NewsRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let key = normalize_title(&r.title);
            !key.is_empty() && title_is_long_enough(&r.title) && seen.insert(key)
        })
        .collect()
}
