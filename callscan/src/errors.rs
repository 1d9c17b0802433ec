//! Error types for callscan.
//!
//! Errors fall into two classes. Setup failures (pattern compilation, an
//! unreadable root directory, an output file that cannot be created, a worker
//! pool that cannot start) abort the run. Per-file read failures are reported
//! by the worker that owns the file and never leave that worker.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while scanning a corpus
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid call pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Cannot list directory {}", .path.display())]
    DirectoryEnumeration {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to create output file {}", .path.display())]
    OutputCreation {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to open file: {}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScanError {
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn directory_enumeration(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryEnumeration {
            path: path.into(),
            source,
        }
    }

    pub fn output_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputCreation {
            path: path.into(),
            source,
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}
