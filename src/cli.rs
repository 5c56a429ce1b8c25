//! Command-line interface definitions.
//!
//! Tunable flags override the values from the config file (or the built-in
//! defaults when no file is given).

use crate::config::AppConfig;
use chrono::NaiveDate;
use clap::Parser;

/// Command-line arguments for the digest run.
///
/// # Examples
///
/// ```sh
/// # Yesterday's digest into ./daily_news
/// daily_digest
///
/// # A specific date, custom feeds, JSON copy alongside the Markdown
/// daily_digest -d 2025-05-06 -c feeds.yaml --json -o ~/news
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory the report is written to
    #[arg(short, long, env = "DAILY_DIGEST_OUTPUT_DIR", default_value = "daily_news")]
    pub output_dir: String,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "DAILY_DIGEST_CONFIG")]
    pub config: Option<String>,

    /// Target date (YYYY-MM-DD); defaults to yesterday in local time
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Maximum number of feeds fetched concurrently
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Entries considered per feed
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Items per category printed to the console
    #[arg(long)]
    pub display: Option<usize>,

    /// Also write a JSON copy of the digest
    #[arg(long)]
    pub json: bool,

    /// Skip the console report and per-source progress lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Apply the tunable flags on top of `config`.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        let t = &mut config.tunables;
        if let Some(workers) = self.workers {
            t.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            t.request_timeout_secs = timeout;
            // The wait bound must outlast the request it guards.
            t.harvest_timeout_secs = t.harvest_timeout_secs.max(timeout + 2);
        }
        if let Some(max_items) = self.max_items {
            t.max_items_per_source = max_items;
        }
        if let Some(display) = self.display {
            t.max_display_count = display;
        }
    }
}
