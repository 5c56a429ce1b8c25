//! # Daily Digest
//!
//! Collects the previous day's headlines from a fixed set of RSS/Atom feeds,
//! removes duplicates, sorts them into topics and writes a Markdown report.
//!
//! ## Usage
//!
//! ```sh
//! daily_digest -o ./daily_news
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Every feed is fetched concurrently (8 at a time by default),
//!    each under its own timeout
//! 2. **Filtering**: Entries are kept only if published on the target date
//!    (or undated)
//! 3. **Digest**: Headlines are deduplicated by normalized title and grouped by
//!    keyword category
//! 4. **Output**: A Markdown report (and optionally JSON) keyed by date

use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod categorize;
mod cli;
mod config;
mod diagnostics;
mod digest;
mod error;
mod feeds;
mod models;
mod outputs;
mod pipeline;
mod scheduler;
mod utils;

use cli::Cli;
use config::AppConfig;
use diagnostics::Diagnostics;
use feeds::http::HttpTransport;
use outputs::{console, json, markdown};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = run(&args).await {
        error!(error = %e, "Run failed");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    // ---- Configuration ----
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate()?;
    let tunables = config.tunables.clone();
    info!(?tunables, sources = config.sources().count(), "Configuration ready");

    let target_date = args.date.unwrap_or_else(yesterday);
    let date_str = target_date.format("%Y-%m-%d").to_string();

    // Fail before any network traffic if the report cannot be written.
    let output_dir = Path::new(&args.output_dir);
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(format!("output directory {} is not writable: {e}", output_dir.display()).into());
    }

    let diagnostics = if args.quiet {
        Diagnostics::sink()
    } else {
        Diagnostics::stdout()
    };
    diagnostics.line(&console::banner(
        &date_str,
        config.domestic_sources.len(),
        config.international_sources.len(),
        tunables.workers,
    ));

    // ---- Aggregate ----
    let transport = HttpTransport::new(tunables.request_timeout())?;
    let aggregation = tokio::select! {
        aggregation = pipeline::aggregate(&config, transport, diagnostics.clone(), target_date) => aggregation,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; nothing was written");
            diagnostics.line("\nInterrupted.");
            return Err("interrupted by user".into());
        }
    };
    let digest = &aggregation.digest;

    diagnostics.line(&console::tally_line(&aggregation.tally));
    diagnostics.line(&console::render(digest, tunables.max_display_count));

    if digest.is_empty() {
        info!(date = %date_str, "No news found; no report written");
        return Ok(());
    }

    for (category, records) in digest.by_category.iter() {
        info!(%category, count = records.len(), "Category total");
    }

    // ---- Output ----
    let generated_at = Local::now().naive_local();
    let path = markdown::write_report(digest, output_dir, generated_at).await?;
    diagnostics.line(&format!("\n[+] Report saved to: {}", path.display()));

    if args.json {
        match json::write_digest(digest, aggregation.tally, output_dir, generated_at).await {
            Ok(path) => diagnostics.line(&format!("[+] JSON saved to: {}", path.display())),
            Err(e) => error!(error = %e, "Failed to write JSON digest"),
        }
    }

    info!(
        date = %date_str,
        unique = digest.unique.len(),
        succeeded = aggregation.tally.succeeded,
        failed = aggregation.tally.failed,
        "Digest complete"
    );
    Ok(())
}

/// The calendar day before today, local time.
fn yesterday() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
