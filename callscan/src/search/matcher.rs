use regex::bytes::{CaptureLocations, Regex};
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};

/// Marker literal anchoring every candidate call expression
pub const DEFAULT_MARKER: &str = "myFunction";

/// Maximum number of bytes handed to the pattern per occurrence
pub const DEFAULT_WINDOW_SIZE: usize = 100;

const TAG_GROUP: usize = 1;
const IDENTIFIER_GROUP: usize = 2;

/// Builds the call expression pattern for a marker.
///
/// Unicode is disabled so `\s` is ASCII whitespace and `[^"]` matches any
/// byte other than a double quote, newlines included. `\A` pins the match to
/// the first byte of the window.
fn call_pattern(marker: &str) -> String {
    format!(
        r#"(?-u)\A{}\s*\(\s*"\s*(?P<tag>[a-zA-Z]+)\s+(?P<identifier>[^"]*)"\s*\)\s*;"#,
        regex::escape(marker)
    )
}

/// Byte ranges reported for one successful match, relative to the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMatch {
    /// Marker through the terminating `;`
    pub full: Range<usize>,
    /// Capture group 1: the alphabetic tag
    pub tag: Range<usize>,
    /// Capture group 2: the free-form identifier text before normalization
    pub identifier: Range<usize>,
}

/// Compiled call pattern, shared read-only by every worker
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    marker: String,
    regex: Arc<Regex>,
}

impl PatternMatcher {
    /// Compiles the call pattern for `marker`
    pub fn new(marker: &str) -> ScanResult<Self> {
        if marker.is_empty() {
            return Err(ScanError::invalid_pattern("marker must not be empty"));
        }

        let source = call_pattern(marker);
        let regex = Regex::new(&source).map_err(|e| ScanError::invalid_pattern(e.to_string()))?;
        debug!("Compiled call pattern: {}", source);

        Ok(Self {
            marker: marker.to_string(),
            regex: Arc::new(regex),
        })
    }

    /// The literal text that starts every call expression
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Creates an independent match context for one worker
    pub fn context(&self) -> MatchContext<'_> {
        MatchContext {
            regex: &self.regex,
            locations: self.regex.capture_locations(),
        }
    }
}

/// Per-worker match state.
///
/// The capture buffer is mutated on every attempt, so each worker owns its
/// own context while the compiled pattern stays shared.
#[derive(Debug)]
pub struct MatchContext<'m> {
    regex: &'m Regex,
    locations: CaptureLocations,
}

impl MatchContext<'_> {
    /// Matches the call expression at the start of `window`.
    ///
    /// Returns `None` when the marker at offset 0 does not begin a complete
    /// call expression inside the window.
    pub fn match_window(&mut self, window: &[u8]) -> Option<CallMatch> {
        let full = self.regex.captures_read(&mut self.locations, window)?;
        let (tag_start, tag_end) = self.locations.get(TAG_GROUP)?;
        let (id_start, id_end) = self.locations.get(IDENTIFIER_GROUP)?;

        Some(CallMatch {
            full: full.range(),
            tag: tag_start..tag_end,
            identifier: id_start..id_end,
        })
    }
}
