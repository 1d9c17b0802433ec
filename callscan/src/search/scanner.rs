use memchr::memmem::Finder;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;
use tracing::trace;

use super::matcher::{MatchContext, PatternMatcher};
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;
use crate::results::CallRecord;

/// Files at or above this size are memory mapped instead of read into memory
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// File bytes, either owned or mapped
enum Content {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for Content {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Content::Owned(bytes) => bytes.as_slice(),
            Content::Mapped(map) => &map[..],
        }
    }
}

/// Extracts call records from one file at a time.
///
/// A scanner owns its match context, so each worker creates one and reuses it
/// for every file in its shard.
pub struct FileScanner<'m> {
    context: MatchContext<'m>,
    finder: Finder<'m>,
    window_size: usize,
    metrics: &'m ScanMetrics,
}

impl<'m> FileScanner<'m> {
    pub fn new(matcher: &'m PatternMatcher, window_size: usize, metrics: &'m ScanMetrics) -> Self {
        Self {
            context: matcher.context(),
            finder: Finder::new(matcher.marker().as_bytes()),
            window_size,
            metrics,
        }
    }

    /// Reads `path` and scans its content.
    ///
    /// Records carry the file's base name, not the path it was opened by.
    pub fn scan_file(&mut self, path: &Path) -> ScanResult<Vec<CallRecord>> {
        trace!("Scanning file: {}", path.display());

        let (content, mapped) = read_content(path)?;
        self.metrics
            .record_file_scanned(content.len() as u64, mapped);

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());

        Ok(self.scan_content(&file_name, &content))
    }

    /// Scans in-memory content, returning records in occurrence order.
    ///
    /// After each marker occurrence at `p` the search resumes at `p + 1`, so
    /// overlapping occurrences each get their own match attempt.
    pub fn scan_content(&mut self, source_file: &str, content: &[u8]) -> Vec<CallRecord> {
        let mut records = Vec::new();
        let mut occurrences = 0u64;
        let mut pos = 0;

        while let Some(offset) = self.finder.find(&content[pos..]) {
            let start = pos + offset;
            occurrences += 1;

            let end = start + self.window_size.min(content.len() - start);
            let window = &content[start..end];

            if let Some(m) = self.context.match_window(window) {
                let full_call = &content[start + m.full.start..start + m.full.end];
                records.push(CallRecord::new(
                    source_file,
                    String::from_utf8_lossy(full_call),
                    &String::from_utf8_lossy(&window[m.tag]),
                    &String::from_utf8_lossy(&window[m.identifier]),
                ));
            }

            pos = start + 1;
        }

        self.metrics
            .record_matches(occurrences, records.len() as u64);
        records
    }
}

fn read_content(path: &Path) -> ScanResult<(Content, bool)> {
    let file = File::open(path).map_err(|e| ScanError::file_read(path, e))?;
    let size = file
        .metadata()
        .map_err(|e| ScanError::file_read(path, e))?
        .len();

    if size >= LARGE_FILE_THRESHOLD {
        trace!("Memory mapping {} ({} bytes)", path.display(), size);
        // SAFETY: the map is read-only and dropped before the scan returns
        let map = unsafe { Mmap::map(&file) }.map_err(|e| ScanError::file_read(path, e))?;
        return Ok((Content::Mapped(map), true));
    }

    let mut bytes = Vec::with_capacity(size as usize);
    (&file)
        .read_to_end(&mut bytes)
        .map_err(|e| ScanError::file_read(path, e))?;
    Ok((Content::Owned(bytes), false))
}
