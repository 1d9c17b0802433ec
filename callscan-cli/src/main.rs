use anyhow::{bail, Context, Result};
use callscan::{
    walk, CliOverrides, QuotingMode, ScanConfig, ScanCoordinator, ScanOutput, TableWriter,
};
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan (prompted for when omitted)
    root: Option<PathBuf>,

    /// CSV file to write
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Required file extension (e.g. java)
    #[arg(short = 'e', long)]
    extension: Option<String>,

    /// Literal that starts each call expression
    #[arg(short = 'm', long)]
    marker: Option<String>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Bytes examined after each marker occurrence
    #[arg(short = 'w', long)]
    window: Option<usize>,

    /// Scan subdirectories as well
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Paths to ignore (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// CSV quoting rule (minimal|strict)
    #[arg(long)]
    quoting: Option<String>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print scan counters after the summary
    #[arg(short, long)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let quoting = cli
        .quoting
        .as_deref()
        .map(str::parse::<QuotingMode>)
        .transpose()?;

    let config = ScanConfig::load_from(cli.config.as_deref())
        .context("loading configuration")?
        .merge_with_cli(CliOverrides {
            root_path: cli.root,
            marker: cli.marker,
            extension: cli.extension,
            window_size: cli.window,
            thread_count: cli.threads,
            recursive: cli.recursive,
            ignore_patterns: cli.ignore,
            output_path: cli.output,
            quoting,
            log_level: cli.log_level,
        });

    init_tracing(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    // Compile before prompting so a bad marker fails fast
    let coordinator = ScanCoordinator::from_config(&config).context("compiling call pattern")?;

    let root = match &config.root_path {
        Some(root) => root.clone(),
        None => prompt_for_directory(&config.extension)?,
    };

    let paths = walk::collect_candidate_paths(&root, config.recursive, &config.ignore_patterns)
        .with_context(|| format!("listing {}", root.display()))?;

    // Open the output before any worker starts
    let table = TableWriter::create(&config.output_path)
        .with_context(|| format!("writing {}", config.output_path.display()))?;

    let output = coordinator.run(&paths).context("scanning files")?;

    TableWriter::new(config.quoting)
        .write_to(table, &output.records)
        .with_context(|| format!("writing {}", config.output_path.display()))?;
    debug!(
        "Wrote {} records to {}",
        output.total_records(),
        config.output_path.display()
    );

    print_summary(&output, &config, cli.stats);
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt_for_directory(extension: &str) -> Result<PathBuf> {
    let extension = extension.trim_start_matches('.');
    print!("Enter directory path containing .{} files: ", extension);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading directory path")?;

    let directory = line.trim_end_matches(['\r', '\n']);
    if directory.is_empty() {
        bail!("no directory path given");
    }
    Ok(PathBuf::from(directory))
}

fn print_summary(output: &ScanOutput, config: &ScanConfig, show_stats: bool) {
    println!(
        "Processed {} function calls with {} threads. Output written to {}",
        output.total_records(),
        output.thread_count,
        config.output_path.display().to_string().blue()
    );

    if show_stats {
        let stats = &output.stats;
        println!(
            "Files scanned: {} (skipped {}, failed {})",
            stats.files_scanned.to_string().green(),
            stats.files_skipped,
            stats.files_failed.to_string().red()
        );
        println!(
            "Marker occurrences: {}, calls extracted: {}",
            stats.occurrences, stats.records
        );
    }
}
