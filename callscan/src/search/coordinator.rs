use parking_lot::Mutex;
use rayon::ThreadPoolBuilder;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::matcher::PatternMatcher;
use super::scanner::FileScanner;
use crate::config::ScanConfig;
use crate::errors::ScanResult;
use crate::filters::has_extension;
use crate::metrics::ScanMetrics;
use crate::results::{CallRecord, ScanOutput};

/// Splits `len` items into `workers` contiguous shards.
///
/// Every shard but the last holds `len / workers` items; the last absorbs the
/// remainder. With fewer items than workers all leading shards are empty.
pub fn partition(len: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let workers = workers.get();
    let per_shard = len / workers;
    (0..workers)
        .map(|i| {
            let start = i * per_shard;
            let end = if i == workers - 1 {
                len
            } else {
                (i + 1) * per_shard
            };
            start..end
        })
        .collect()
}

/// Runs the scan over a fixed pool of workers, one per shard
#[derive(Debug, Clone)]
pub struct ScanCoordinator {
    matcher: PatternMatcher,
    extension: String,
    window_size: usize,
    thread_count: NonZeroUsize,
}

impl ScanCoordinator {
    pub fn new(
        matcher: PatternMatcher,
        extension: impl Into<String>,
        window_size: usize,
        thread_count: NonZeroUsize,
    ) -> Self {
        Self {
            matcher,
            extension: extension.into(),
            window_size,
            thread_count,
        }
    }

    /// Validates `config` and compiles its call pattern
    pub fn from_config(config: &ScanConfig) -> ScanResult<Self> {
        config.validate()?;
        let matcher = PatternMatcher::new(&config.marker)?;
        Ok(Self::new(
            matcher,
            config.extension.clone(),
            config.window_size,
            config.thread_count,
        ))
    }

    /// Scans every path and returns the merged records.
    ///
    /// Each worker collects records privately and appends them to the shared
    /// list once, after its whole shard is done. The merged list is ordered by
    /// shard so the output does not depend on which worker finished first.
    pub fn run(&self, paths: &[PathBuf]) -> ScanResult<ScanOutput> {
        info!(
            "Scanning {} paths for '{}' with {} workers",
            paths.len(),
            self.matcher.marker(),
            self.thread_count
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.thread_count.get())
            .thread_name(|i| format!("callscan-worker-{}", i))
            .build()?;

        let metrics = ScanMetrics::new();
        let shards = partition(paths.len(), self.thread_count);
        let merged: Mutex<Vec<(usize, Vec<CallRecord>)>> = Mutex::new(Vec::with_capacity(shards.len()));

        pool.scope(|scope| {
            for (index, range) in shards.into_iter().enumerate() {
                let shard = &paths[range];
                let metrics = &metrics;
                let merged = &merged;
                scope.spawn(move |_| {
                    let local = self.scan_shard(index, shard, metrics);
                    merged.lock().push((index, local));
                });
            }
        });

        let mut shard_results = merged.into_inner();
        shard_results.sort_unstable_by_key(|(index, _)| *index);
        let records: Vec<CallRecord> = shard_results
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect();

        metrics.log_stats();
        info!("Scan complete. Found {} calls", records.len());

        Ok(ScanOutput {
            records,
            thread_count: self.thread_count,
            stats: metrics.snapshot(),
        })
    }

    /// Scans one shard sequentially
    fn scan_shard(&self, index: usize, shard: &[PathBuf], metrics: &ScanMetrics) -> Vec<CallRecord> {
        debug!("Worker {} starting shard of {} paths", index, shard.len());

        let mut scanner = FileScanner::new(&self.matcher, self.window_size, metrics);
        let mut local = Vec::new();

        for path in shard {
            if !has_extension(path, &self.extension) {
                metrics.record_file_skipped();
                continue;
            }
            match scanner.scan_file(path) {
                Ok(records) => local.extend(records),
                Err(e) => {
                    match std::error::Error::source(&e) {
                        Some(cause) => warn!("{}: {}", e, cause),
                        None => warn!("{}", e),
                    }
                    metrics.record_file_failed();
                }
            }
        }

        debug!("Worker {} finished with {} records", index, local.len());
        local
    }
}
