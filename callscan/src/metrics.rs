use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Counters shared by every worker of one scan
#[derive(Debug, Default)]
pub struct ScanMetrics {
    files_scanned: AtomicU64,
    files_skipped: AtomicU64,
    files_failed: AtomicU64,
    bytes_read: AtomicU64,
    mmap_files: AtomicU64,
    occurrences: AtomicU64,
    records: AtomicU64,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file whose content was read and scanned
    pub fn record_file_scanned(&self, bytes: u64, mapped: bool) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
        if mapped {
            self.mmap_files.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a path dropped by the extension filter
    pub fn record_file_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file that could not be read
    pub fn record_file_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records marker occurrences and the records they produced for one file
    pub fn record_matches(&self, occurrences: u64, records: u64) {
        self.occurrences.fetch_add(occurrences, Ordering::Relaxed);
        self.records.fetch_add(records, Ordering::Relaxed);
    }

    /// Gets a copy of the current counters
    pub fn snapshot(&self) -> ScanStats {
        ScanStats {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            mmap_files: self.mmap_files.load(Ordering::Relaxed),
            occurrences: self.occurrences.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.snapshot();
        info!(
            "Scan stats:\n\
             Files scanned/skipped/failed: {}/{}/{}\n\
             Bytes read: {} ({} files memory mapped)\n\
             Marker occurrences: {}\n\
             Records: {}",
            stats.files_scanned,
            stats.files_skipped,
            stats.files_failed,
            stats.bytes_read,
            stats.mmap_files,
            stats.occurrences,
            stats.records
        );
    }
}

/// Point-in-time copy of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub bytes_read: u64,
    pub mmap_files: u64,
    pub occurrences: u64,
    pub records: u64,
}
