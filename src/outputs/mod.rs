//! Renderers for the finished [`crate::digest::Digest`].
//!
//! # Submodules
//!
//! - [`markdown`]: The daily report file, one per target date
//! - [`json`]: Optional machine-readable copy of the same data
//! - [`console`]: Summary printed to the terminal at the end of a run
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── 2025-05-06.md
//! └── 2025-05-06.json   # with --json
//! ```

pub mod console;
pub mod json;
pub mod markdown;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// `<dir>/<YYYY-MM-DD>.<ext>`
pub fn artifact_path(dir: &Path, date: NaiveDate, ext: &str) -> PathBuf {
    dir.join(format!("{}.{ext}", date.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_is_keyed_by_date() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 6).unwrap();
        assert_eq!(
            artifact_path(Path::new("/tmp/news"), date, "md"),
            PathBuf::from("/tmp/news/2025-05-06.md")
        );
    }
}
