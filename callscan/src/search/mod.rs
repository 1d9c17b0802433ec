//! The scan-and-extract pipeline.
//!
//! ```text
//! paths ─► ScanCoordinator ─► shard per worker ─► FileScanner per file
//!                                                   │
//!                              marker occurrence ◄──┘
//!                                     │
//!                         bounded window ─► MatchContext ─► CallRecord
//! ```
//!
//! The compiled [`PatternMatcher`] is built once and shared by reference.
//! Every worker creates its own [`FileScanner`], which owns the mutable
//! capture buffer ([`MatchContext`]) used for each match attempt, so no match
//! state is ever shared between threads.
//!
//! Records are collected in a worker-local list while its shard is scanned and
//! merged into the shared result once, under a lock, when the shard is done.
pub mod coordinator;
pub mod matcher;
pub mod normalize;
pub mod scanner;

pub use coordinator::{partition, ScanCoordinator};
pub use matcher::{CallMatch, MatchContext, PatternMatcher};
pub use normalize::normalize_field;
pub use scanner::FileScanner;
