pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;
pub mod table;
pub mod walk;

pub use config::{CliOverrides, ScanConfig};
pub use errors::{ScanError, ScanResult};
pub use results::{CallRecord, ScanOutput};
pub use search::{PatternMatcher, ScanCoordinator};
pub use table::{QuotingMode, TableWriter};

use std::path::Path;
use tracing::info;

/// Compiles the pattern, lists `root` and scans every candidate file.
///
/// Setup failures are reported before any worker starts.
pub fn scan_directory(root: &Path, config: &ScanConfig) -> ScanResult<ScanOutput> {
    let coordinator = ScanCoordinator::from_config(config)?;
    let paths = walk::collect_candidate_paths(root, config.recursive, &config.ignore_patterns)?;
    info!("Listed {} files under {}", paths.len(), root.display());
    coordinator.run(&paths)
}
