//! Wires the stages together: fan-out fetch, priority merge, dedupe, group.

use crate::categorize::Categorizer;
use crate::config::AppConfig;
use crate::diagnostics::Diagnostics;
use crate::digest::Digest;
use crate::feeds::FeedTransport;
use crate::feeds::fetcher::FeedFetcher;
use crate::scheduler::{Scheduler, SourceTally};
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

/// Result of one aggregation run.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub digest: Digest,
    pub tally: SourceTally,
}

/// Fetch every configured source for `target_date` and build the digest.
///
/// Batches are merged in source configuration order before deduplication, so
/// when two sources carry the same headline the one listed first keeps it
/// regardless of which finished first.
///
/// # Arguments
///
/// * `config` - Validated configuration (sources, tunables, keywords)
/// * `transport` - How feed bodies are retrieved
/// * `diagnostics` - Per-source progress output
/// * `target_date` - Only entries from this day (or undated ones) are kept
#[instrument(level = "info", skip_all, fields(target_date = %target_date))]
pub async fn aggregate<T: FeedTransport>(
    config: &AppConfig,
    transport: T,
    diagnostics: Diagnostics,
    target_date: NaiveDate,
) -> Aggregation {
    let tunables = &config.tunables;
    let sources = config.source_list();
    let fetcher = FeedFetcher::new(transport, tunables.max_items_per_source);
    let scheduler = Scheduler::new(tunables.workers, tunables.harvest_timeout(), diagnostics);

    let harvest = scheduler.run_all(&fetcher, &sources, target_date).await;
    for batch in &harvest.batches {
        debug!(source = %batch.source, index = batch.index, records = batch.records.len(), "Harvested batch");
    }
    info!(batches = harvest.batches.len(), records = harvest.record_count(), "Merged harvest");
    let tally = harvest.tally;
    let records = harvest.into_prioritized_records();

    let categorizer = Categorizer::new(&config.keywords);
    let digest = Digest::build(records, &categorizer, target_date);
    info!(unique = digest.unique.len(), "Digest ready");
    Aggregation { digest, tally }
}
