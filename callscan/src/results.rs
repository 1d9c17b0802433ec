//! Record types produced by a scan.
//!
//! A [`CallRecord`] is built once from the raw captures of a match and never
//! changes afterwards; its fields are only reachable through accessors. Records
//! carry no identity beyond their values, so identical calls found twice stay
//! as two records.
use std::num::NonZeroUsize;

use crate::metrics::ScanStats;
use crate::search::normalize::normalize_field;

/// One marker call expression found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    source_file: String,
    full_call: String,
    argument: String,
    tag: String,
    identifier: String,
}

impl CallRecord {
    /// Builds a record from raw capture text.
    ///
    /// `argument` is the raw tag and identifier joined by one space, then
    /// normalized as a whole. `tag` and `identifier` are normalized on their own.
    pub fn new(
        source_file: impl Into<String>,
        full_call: impl Into<String>,
        raw_tag: &str,
        raw_identifier: &str,
    ) -> Self {
        let argument = format!("{} {}", raw_tag, raw_identifier);
        Self {
            source_file: source_file.into(),
            full_call: full_call.into(),
            argument: normalize_field(&argument).to_string(),
            tag: normalize_field(raw_tag).to_string(),
            identifier: normalize_field(raw_identifier).to_string(),
        }
    }

    /// Base name of the file the call was found in
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Exact call text, marker through the terminating `;`
    pub fn full_call(&self) -> &str {
        &self.full_call
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Fields in table column order
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.source_file,
            &self.full_call,
            &self.argument,
            &self.tag,
            &self.identifier,
        ]
    }
}

/// Everything a completed scan returns
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Records ordered by shard, then by file within the shard, then by
    /// occurrence within the file
    pub records: Vec<CallRecord>,
    /// Number of workers the scan ran with
    pub thread_count: NonZeroUsize,
    /// Counters collected while scanning
    pub stats: ScanStats,
}

impl ScanOutput {
    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    /// Records found in the file with the given base name, in occurrence order
    pub fn records_for<'a>(&'a self, source_file: &'a str) -> impl Iterator<Item = &'a CallRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.source_file == source_file)
    }
}
