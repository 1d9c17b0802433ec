use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};
use crate::search::matcher::{DEFAULT_MARKER, DEFAULT_WINDOW_SIZE};
use crate::table::{QuotingMode, DEFAULT_OUTPUT};

/// Configuration for a scan run.
///
/// # Configuration Locations
///
/// Files are merged in this order, later entries winning:
/// 1. Global `$CONFIG_DIR/callscan/config.yaml`
/// 2. Local `.callscan.yaml` in the current directory
/// 3. Custom config file passed with `--config`
///
/// Command-line values are applied last through [`ScanConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Directory to scan; prompted for when absent
/// root_path: "src/main/java"
///
/// # Literal that starts every call expression
/// marker: "myFunction"
///
/// # Only files with this extension are scanned
/// extension: "java"
///
/// # Bytes examined after each marker occurrence
/// window_size: 100
///
/// # Worker count (default: CPU cores)
/// thread_count: 8
///
/// # Descend into subdirectories
/// recursive: false
///
/// # Paths to skip (glob syntax)
/// ignore_patterns:
///   - "**/generated/**"
///
/// output_path: "function_calls.csv"
///
/// # minimal or strict
/// quoting: "minimal"
///
/// log_level: "warn"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory to scan
    #[serde(default)]
    pub root_path: Option<PathBuf>,

    /// Literal text that anchors each call expression
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Required file extension, with or without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Maximum bytes matched after each marker occurrence.
    /// Calls longer than this are not recognized.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Number of workers; the path list is split into this many shards
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Whether to scan subdirectories of the root
    #[serde(default)]
    pub recursive: bool,

    /// Patterns to ignore (supports glob syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Where the CSV table is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Quoting rule for the CSV table
    #[serde(default)]
    pub quoting: QuotingMode,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_extension() -> String {
    "java".to_string()
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            marker: default_marker(),
            extension: default_extension(),
            window_size: default_window_size(),
            thread_count: default_thread_count(),
            recursive: false,
            ignore_patterns: Vec::new(),
            output_path: default_output_path(),
            quoting: QuotingMode::default(),
            log_level: default_log_level(),
        }
    }
}

/// Values given on the command line; `None` leaves the file value in place
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub marker: Option<String>,
    pub extension: Option<String>,
    pub window_size: Option<usize>,
    pub thread_count: Option<NonZeroUsize>,
    pub recursive: bool,
    pub ignore_patterns: Vec<String>,
    pub output_path: Option<PathBuf>,
    pub quoting: Option<QuotingMode>,
    pub log_level: Option<String>,
}

impl ScanConfig {
    /// Loads configuration from the default locations, adding `config_path`
    /// on top when given
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("callscan/config.yaml")),
            Some(PathBuf::from(".callscan.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicitly requested file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Applies command-line values over configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if cli.root_path.is_some() {
            self.root_path = cli.root_path;
        }
        if let Some(marker) = cli.marker {
            self.marker = marker;
        }
        if let Some(extension) = cli.extension {
            self.extension = extension;
        }
        if let Some(window_size) = cli.window_size {
            self.window_size = window_size;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if cli.recursive {
            self.recursive = true;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if let Some(output_path) = cli.output_path {
            self.output_path = output_path;
        }
        if let Some(quoting) = cli.quoting {
            self.quoting = quoting;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Rejects settings no scan can run with
    pub fn validate(&self) -> ScanResult<()> {
        if self.marker.is_empty() {
            return Err(ScanError::invalid_config("marker must not be empty"));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ScanError::invalid_config("extension must not be empty"));
        }
        if self.window_size < self.marker.len() {
            return Err(ScanError::invalid_config(format!(
                "window size {} is smaller than the marker '{}'",
                self.window_size, self.marker
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, config_path)
    }

    #[test]
    fn test_load_config_file() {
        let (_dir, config_path) = write_config(
            r#"
            root_path: "src"
            marker: "auditLog"
            extension: "kt"
            window_size: 160
            thread_count: 4
            recursive: true
            ignore_patterns: ["**/generated/**"]
            output_path: "audit.csv"
            quoting: "strict"
            log_level: "debug"
        "#,
        );

        let config = ScanConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.root_path, Some(PathBuf::from("src")));
        assert_eq!(config.marker, "auditLog");
        assert_eq!(config.extension, "kt");
        assert_eq!(config.window_size, 160);
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert!(config.recursive);
        assert_eq!(config.ignore_patterns, vec!["**/generated/**".to_string()]);
        assert_eq!(config.output_path, PathBuf::from("audit.csv"));
        assert_eq!(config.quoting, QuotingMode::Strict);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_values() {
        let (_dir, config_path) = write_config(
            r#"
            extension: "java"
        "#,
        );

        let config = ScanConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.root_path, None);
        assert_eq!(config.marker, "myFunction");
        assert_eq!(config.window_size, 100);
        assert_eq!(
            config.thread_count,
            NonZeroUsize::new(num_cpus::get()).unwrap()
        );
        assert!(!config.recursive);
        assert_eq!(config.output_path, PathBuf::from("function_calls.csv"));
        assert_eq!(config.quoting, QuotingMode::Minimal);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_merge_with_cli() {
        let file_config = ScanConfig {
            root_path: Some(PathBuf::from("src")),
            extension: "kt".to_string(),
            thread_count: NonZeroUsize::new(4).unwrap(),
            ignore_patterns: vec!["**/gen/**".to_string()],
            ..Default::default()
        };

        let merged = file_config.merge_with_cli(CliOverrides {
            root_path: Some(PathBuf::from("app")),
            thread_count: NonZeroUsize::new(2),
            quoting: Some(QuotingMode::Strict),
            ..Default::default()
        });

        assert_eq!(merged.root_path, Some(PathBuf::from("app"))); // CLI value
        assert_eq!(merged.thread_count, NonZeroUsize::new(2).unwrap()); // CLI value
        assert_eq!(merged.quoting, QuotingMode::Strict); // CLI value
        assert_eq!(merged.extension, "kt"); // File value (CLI None)
        assert_eq!(merged.ignore_patterns, vec!["**/gen/**".to_string()]); // File value
        assert_eq!(merged.marker, "myFunction"); // Default
    }

    #[test]
    fn test_validate() {
        assert!(ScanConfig::default().validate().is_ok());

        let config = ScanConfig {
            marker: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::InvalidConfig(_))));

        let config = ScanConfig {
            extension: ".".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ScanConfig {
            window_size: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_config() {
        let (_dir, config_path) = write_config(
            r#"
            window_size: "wide"
            thread_count: 0
        "#,
        );

        let result = ScanConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ScanConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }
}
