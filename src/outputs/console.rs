//! End-of-run terminal summary.

use crate::digest::Digest;
use crate::models::Category;
use crate::scheduler::SourceTally;
use std::fmt::Write;

const RULE: &str = "======================================================================";

/// Run banner printed before fetching starts.
///
/// # Arguments
///
/// * `target_date` - Day being collected, already formatted
/// * `domestic` / `international` - Size of each source group
/// * `workers` - Concurrency ceiling for the run
pub fn banner(target_date: &str, domestic: usize, international: usize, workers: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Collecting headlines for {target_date}");
    let _ = writeln!(
        out,
        "{} sources ({domestic} domestic, {international} international), up to {workers} at once",
        domestic + international
    );
    let _ = write!(out, "{RULE}");
    out
}

pub fn tally_line(tally: &SourceTally) -> String {
    format!(
        "[*] Done: {} of {} sources succeeded, {} empty, {} failed",
        tally.succeeded,
        tally.total(),
        tally.empty,
        tally.failed
    )
}

/// Category statistics followed by up to `max_display` items per category.
pub fn render(digest: &Digest, max_display: usize) -> String {
    let date = digest.target_date.format("%Y-%m-%d");
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{date} headlines ({} total)", digest.unique.len());
    let _ = writeln!(out, "{RULE}");

    if digest.is_empty() {
        let _ = writeln!(out, "No news found for {date}. Please try again later.");
        let _ = write!(out, "Feeds may be unreachable or have not published yet.");
        return out;
    }

    let _ = writeln!(out, "\nBy category:");
    for category in Category::ALL {
        let count = digest.by_category.count(category);
        if count > 0 {
            let _ = writeln!(out, "  {category}: {count}");
        }
    }

    for (category, records) in digest.by_category.iter() {
        let _ = writeln!(out, "\n{RULE}");
        let _ = writeln!(out, "[{category}] ({})", records.len());
        let _ = writeln!(out, "{RULE}");
        for (i, record) in records.iter().take(max_display).enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, record.title);
            let _ = writeln!(out, "   source: {} | link: {}", record.source, record.url);
        }
        if records.len() > max_display {
            let _ = writeln!(
                out,
                "   ... {} more saved to file",
                records.len() - max_display
            );
        }
    }
    let _ = writeln!(out, "\n{RULE}");
    let _ = write!(out, "Done: {} headlines collected", digest.unique.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::Categorizer;
    use crate::config::AppConfig;
    use crate::models::NewsRecord;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn digest_of(titles: &[&str]) -> Digest {
        let records = titles
            .iter()
            .filter_map(|t| NewsRecord::new(t, "https://x.test", "X", day()))
            .collect();
        Digest::build(records, &Categorizer::new(&AppConfig::default().keywords), day())
    }

    #[test]
    fn test_empty_digest_prints_no_news_state() {
        let out = render(&digest_of(&[]), 15);
        assert!(out.contains("No news found for 2025-05-06"));
        assert!(!out.contains("By category"));
    }

    #[test]
    fn test_display_cap_reports_remaining() {
        let titles: Vec<String> = (0..5).map(|i| format!("Quiet village story {i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let out = render(&digest_of(&refs), 3);
        assert!(out.contains("  Other: 5"));
        assert!(out.contains("3. Quiet village story 2"));
        assert!(!out.contains("4. Quiet village story 3"));
        assert!(out.contains("... 2 more saved to file"));
    }

    #[test]
    fn test_tally_line() {
        let tally = SourceTally {
            succeeded: 3,
            empty: 1,
            failed: 2,
        };
        assert_eq!(
            tally_line(&tally),
            "[*] Done: 3 of 6 sources succeeded, 1 empty, 2 failed"
        );
    }

    #[test]
    fn test_banner_counts_sources() {
        let out = banner("2025-05-06", 10, 12, 8);
        assert!(out.contains("22 sources (10 domestic, 12 international), up to 8 at once"));
    }
}
