//! Markdown report generation.
//!
//! Layout:
//!
//! ```text
//! # Daily News Digest 2025-05-06
//!
//! *Generated 2025-05-07 08:00:00*
//!
//! **12 stories**
//!
//! ---
//!
//! ## AI (3)
//!
//! 1. [Title](https://link) *(Source)*
//! ...
//! ```
//!
//! Titles are escaped with [`escape_markdown`]; links and source labels are
//! written as-is.

use super::artifact_path;
use crate::digest::Digest;
use crate::models::Category;
use crate::utils::{escape_markdown, write_atomic};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Render the report body.
pub fn digest_to_markdown(digest: &Digest, generated_at: NaiveDateTime) -> String {
    let mut md = String::new();
    let date = digest.target_date.format("%Y-%m-%d");
    let stamp = generated_at.format(TIMESTAMP);

    let _ = writeln!(md, "# Daily News Digest {date}\n");
    let _ = writeln!(md, "*Generated {stamp}*\n");
    let _ = writeln!(md, "**{} stories**\n", digest.unique.len());
    let _ = writeln!(md, "---\n");

    for category in Category::ALL {
        let Some(records) = digest.by_category.get(category) else {
            continue;
        };
        let _ = writeln!(md, "## {category} ({})\n", records.len());
        for (i, record) in records.iter().enumerate() {
            let _ = writeln!(
                md,
                "{}. [{}]({}) *({})*",
                i + 1,
                escape_markdown(&record.title),
                record.url,
                record.source
            );
        }
        md.push('\n');
    }

    let _ = writeln!(md, "---\n");
    let _ = writeln!(
        md,
        "*Generated by {} v{}*",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    let _ = writeln!(md, "*Generated at: {stamp}*");
    md
}

/// Write the report to `<output_dir>/<target_date>.md`, replacing any
/// earlier report for the same date.
///
/// # Arguments
///
/// * `digest` - Non-empty digest to render
/// * `output_dir` - Existing, writable directory
/// * `generated_at` - Local timestamp stamped into the header and footer
///
/// # Errors
///
/// Returns an error naming the target path if the write or rename fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_report(
    digest: &Digest,
    output_dir: &Path,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = artifact_path(output_dir, digest.target_date, "md");
    let md = digest_to_markdown(digest, generated_at);
    write_atomic(&path, md.as_bytes())
        .await
        .map_err(|e| format!("cannot write report {}: {e}", path.display()))?;
    info!(path = %path.display(), "Wrote Markdown report");
    Ok(path)
}
