//! Bounded fan-out of feed fetches.
//!
//! Every source becomes one task. At most `workers` tasks run at once, and
//! results are consumed in completion order as they arrive. Each task is
//! given `harvest_timeout` from the moment it starts; a task that overruns is
//! dropped and counted as failed, so one stuck feed never holds up the rest.
//! A panicking task is caught and counted the same way.

use crate::diagnostics::Diagnostics;
use crate::error::FetchError;
use crate::feeds::FeedTransport;
use crate::feeds::fetcher::FeedFetcher;
use crate::models::{NewsRecord, Source};
use chrono::NaiveDate;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, instrument};

/// Per-source outcome counts, for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceTally {
    /// Sources that yielded at least one record.
    pub succeeded: usize,
    /// Sources that completed cleanly with nothing for the target date.
    pub empty: usize,
    /// Sources that errored, timed out or panicked.
    pub failed: usize,
}

impl SourceTally {
    /// Number of sources that were attempted.
    pub fn total(&self) -> usize {
        self.succeeded + self.empty + self.failed
    }
}

/// Records delivered by one source.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Position of the source in the configured working set.
    pub index: usize,
    pub source: String,
    pub records: Vec<NewsRecord>,
}

/// Everything collected by [`Scheduler::run_all`].
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    /// Non-empty batches in completion order.
    pub batches: Vec<Batch>,
    pub tally: SourceTally,
}

impl Harvest {
    /// All records ordered by source configuration position; each source's
    /// records keep their feed order.
    pub fn into_prioritized_records(self) -> Vec<NewsRecord> {
        self.batches
            .into_iter()
            .sorted_by_key(|b| b.index)
            .flat_map(|b| b.records)
            .collect()
    }

    pub fn record_count(&self) -> usize {
        self.batches.iter().map(|b| b.records.len()).sum()
    }
}

/// Runs fetches for a whole source list under a concurrency ceiling.
#[derive(Debug, Clone)]
pub struct Scheduler {
    workers: usize,
    harvest_timeout: Duration,
    diagnostics: Diagnostics,
}

impl Scheduler {
    /// Build a scheduler.
    ///
    /// # Arguments
    ///
    /// * `workers` - Ceiling on concurrently running fetches (raised to 1 if zero)
    /// * `harvest_timeout` - Time each task gets from its start before it is
    ///   dropped and counted as failed
    /// * `diagnostics` - Where per-source progress lines go
    pub fn new(workers: usize, harvest_timeout: Duration, diagnostics: Diagnostics) -> Self {
        Self {
            workers: workers.max(1),
            harvest_timeout,
            diagnostics,
        }
    }

    /// Fetch every source and merge the results.
    ///
    /// Returns once each task has either delivered or been counted as
    /// failed.
    ///
    /// # Returns
    ///
    /// A [`Harvest`] with non-empty batches in completion order and the
    /// per-source tally. Individual source failures never surface as errors.
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), workers = self.workers, target_date = %target_date))]
    pub async fn run_all<T: FeedTransport>(
        &self,
        fetcher: &FeedFetcher<T>,
        sources: &[Source],
        target_date: NaiveDate,
    ) -> Harvest {
        let t0 = Instant::now();
        let mut completions = stream::iter(sources.iter().enumerate())
            .map(|(index, source)| async move {
                let fetch = AssertUnwindSafe(fetcher.fetch(source, target_date)).catch_unwind();
                let outcome = match timeout(self.harvest_timeout, fetch).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(_)) => Err(FetchError::Panicked),
                    Err(_) => Err(FetchError::HarvestTimeout),
                };
                (index, source, outcome)
            })
            .buffer_unordered(self.workers);

        let mut harvest = Harvest::default();
        while let Some((index, source, outcome)) = completions.next().await {
            match outcome {
                Ok(records) if records.is_empty() => {
                    debug!(source = %source.name, "Source had nothing for target date");
                    harvest.tally.empty += 1;
                }
                Ok(records) => {
                    self.diagnostics.source_found(&source.name, records.len());
                    harvest.tally.succeeded += 1;
                    harvest.batches.push(Batch {
                        index,
                        source: source.name.clone(),
                        records,
                    });
                }
                Err(e) => {
                    self.diagnostics.source_failed(&source.name, &e);
                    harvest.tally.failed += 1;
                }
            }
        }

        info!(
            succeeded = harvest.tally.succeeded,
            empty = harvest.tally.empty,
            failed = harvest.tally.failed,
            records = harvest.record_count(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Harvest complete"
        );
        harvest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::test_support::captured;
    use crate::feeds::fetcher::test_support::{Script, ScriptedTransport, rss};

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn source(i: usize) -> Source {
        Source::new(&format!("S{i}"), &format!("https://s{i}.test/rss"))
    }

    fn body(title: &str) -> String {
        rss(&[(title, None)])
    }

    #[tokio::test]
    async fn test_small_pool_collects_every_source() {
        let sources: Vec<Source> = (0..5).map(source).collect();
        let delays = [120, 40, 200, 80, 160];
        let mut transport = ScriptedTransport::default();
        for (i, delay) in delays.iter().enumerate() {
            transport = transport.with(
                &sources[i].url,
                Script::Body(body(&format!("Headline number {i}")), ms(*delay)),
            );
        }
        let fetcher = FeedFetcher::new(transport, 15);
        let (diag, _) = captured();
        let bound = ms(300);
        let scheduler = Scheduler::new(2, bound, diag);

        let t0 = Instant::now();
        let harvest = scheduler.run_all(&fetcher, &sources, target()).await;
        let elapsed = t0.elapsed();

        assert_eq!(harvest.tally.succeeded, 5);
        assert_eq!(harvest.tally.total(), 5);
        assert_eq!(harvest.record_count(), 5);
        // ceil(5 / 2) rounds of at most `bound` each, plus slack.
        assert!(elapsed < bound * 3 + ms(500), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_stuck_source_is_counted_failed_and_others_survive() {
        let sources: Vec<Source> = (0..5).map(source).collect();
        let transport = ScriptedTransport::default()
            .with(&sources[0].url, Script::Hang)
            .with(&sources[1].url, Script::Body(body("Second source headline"), ms(20)))
            .with(&sources[2].url, Script::Body(body("Third source headline"), ms(30)))
            .with(&sources[3].url, Script::Hang)
            .with(&sources[4].url, Script::Body(body("Fifth source headline"), ms(10)));
        let fetcher = FeedFetcher::new(transport, 15);
        let (diag, buf) = captured();
        let scheduler = Scheduler::new(2, ms(150), diag);

        let t0 = Instant::now();
        let harvest = scheduler.run_all(&fetcher, &sources, target()).await;

        assert_eq!(harvest.tally.failed, 2);
        assert_eq!(harvest.tally.succeeded, 3);
        assert!(t0.elapsed() < ms(150) * 3 + ms(500));
        let out = buf.contents();
        assert!(out.contains("[-] S0: no result within wait bound"));
        assert!(out.contains("[-] S3: no result within wait bound"));
        assert!(out.contains("[+] S4: found 1"));
    }

    #[tokio::test]
    async fn test_results_arrive_in_completion_order() {
        let sources: Vec<Source> = (0..3).map(source).collect();
        let transport = ScriptedTransport::default()
            .with(&sources[0].url, Script::Body(body("Slowest source story"), ms(150)))
            .with(&sources[1].url, Script::Body(body("Middle source story"), ms(80)))
            .with(&sources[2].url, Script::Body(body("Fastest source story"), ms(10)));
        let fetcher = FeedFetcher::new(transport, 15);
        let (diag, _) = captured();
        let scheduler = Scheduler::new(3, ms(1000), diag);

        let harvest = scheduler.run_all(&fetcher, &sources, target()).await;
        let completed: Vec<&str> = harvest.batches.iter().map(|b| b.source.as_str()).collect();
        assert_eq!(completed, vec!["S2", "S1", "S0"]);

        let prioritized: Vec<String> = harvest
            .into_prioritized_records()
            .into_iter()
            .map(|r| r.source)
            .collect();
        assert_eq!(prioritized, vec!["S0", "S1", "S2"]);
    }

    #[tokio::test]
    async fn test_panicking_task_is_contained() {
        let sources: Vec<Source> = (0..2).map(source).collect();
        let transport = ScriptedTransport::default()
            .with(&sources[0].url, Script::Panic)
            .with(&sources[1].url, Script::Body(body("Healthy source story"), ms(5)));
        let fetcher = FeedFetcher::new(transport, 15);
        let (diag, buf) = captured();
        let scheduler = Scheduler::new(2, ms(1000), diag);

        let harvest = scheduler.run_all(&fetcher, &sources, target()).await;
        assert_eq!(harvest.tally.failed, 1);
        assert_eq!(harvest.tally.succeeded, 1);
        assert_eq!(harvest.record_count(), 1);
        assert!(buf.contents().contains("[-] S0: task panicked"));
    }

    #[tokio::test]
    async fn test_transport_errors_and_empty_feeds_are_tallied_separately() {
        let sources: Vec<Source> = (0..3).map(source).collect();
        let transport = ScriptedTransport::default()
            .with(&sources[0].url, Script::Fail(|| FetchError::Timeout, ms(5)))
            .with(&sources[1].url, Script::Body(rss(&[]), ms(5)))
            .with(
                &sources[2].url,
                Script::Body(
                    rss(&[("Stale story from last year", Some("Mon, 06 May 2024 10:00:00 GMT"))]),
                    ms(5),
                ),
            );
        let fetcher = FeedFetcher::new(transport, 15);
        let (diag, buf) = captured();
        let scheduler = Scheduler::new(4, ms(1000), diag);

        let harvest = scheduler.run_all(&fetcher, &sources, target()).await;
        assert_eq!(
            harvest.tally,
            SourceTally {
                succeeded: 0,
                empty: 2,
                failed: 1
            }
        );
        assert!(harvest.batches.is_empty());
        assert_eq!(buf.contents(), "    [-] S0: request timed out\n");
    }

    #[tokio::test]
    async fn test_http_error_status_counts_as_failed() {
        let sources: Vec<Source> = (0..2).map(source).collect();
        let transport = ScriptedTransport::default()
            .with(&sources[0].url, Script::Fail(|| FetchError::Status(503), ms(5)))
            .with(&sources[1].url, Script::Body(body("Working source headline"), ms(5)));
        let fetcher = FeedFetcher::new(transport, 15);
        let (diag, buf) = captured();
        let harvest = Scheduler::new(2, ms(1000), diag)
            .run_all(&fetcher, &sources, target())
            .await;

        assert_eq!(harvest.tally.failed, 1);
        assert_eq!(harvest.tally.succeeded, 1);
        let out = buf.contents();
        assert!(out.contains("    [-] S0: HTTP status 503\n"));
        assert!(out.contains("    [+] S1: found 1\n"));
    }

    #[tokio::test]
    async fn test_no_sources_is_an_empty_harvest() {
        let fetcher = FeedFetcher::new(ScriptedTransport::default(), 15);
        let (diag, _) = captured();
        let harvest = Scheduler::new(8, ms(100), diag)
            .run_all(&fetcher, &[], target())
            .await;
        assert_eq!(harvest.tally.total(), 0);
        assert!(harvest.batches.is_empty());
    }
}
