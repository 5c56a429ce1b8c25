//! JSON copy of the digest for programmatic consumers.

use super::artifact_path;
use crate::digest::Digest;
use crate::models::{Category, NewsRecord};
use crate::scheduler::SourceTally;
use crate::utils::write_atomic;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    target_date: NaiveDate,
    generated_at: NaiveDateTime,
    total: usize,
    sources: SourceTally,
    categories: Vec<JsonCategory<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonCategory<'a> {
    category: Category,
    label: &'static str,
    count: usize,
    items: &'a [NewsRecord],
}

/// Serialize the digest and run tally as pretty-printed JSON.
///
/// Categories appear in display order; empty ones are omitted.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] if serialization fails.
pub fn digest_to_json(
    digest: &Digest,
    tally: SourceTally,
    generated_at: NaiveDateTime,
) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        target_date: digest.target_date,
        generated_at,
        total: digest.unique.len(),
        sources: tally,
        categories: digest
            .by_category
            .iter()
            .map(|(category, items)| JsonCategory {
                category,
                label: category.label(),
                count: items.len(),
                items,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}

/// Write `<output_dir>/<target_date>.json`.
///
/// # Returns
///
/// The path that was written.
///
/// # Errors
///
/// Serialization failures and I/O errors from the atomic write.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_digest(
    digest: &Digest,
    tally: SourceTally,
    output_dir: &Path,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = artifact_path(output_dir, digest.target_date, "json");
    let json = digest_to_json(digest, tally, generated_at)?;
    write_atomic(&path, json.as_bytes()).await?;
    info!(path = %path.display(), "Wrote JSON digest");
    Ok(path)
}
