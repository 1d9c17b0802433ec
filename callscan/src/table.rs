//! CSV output for scan records.
//!
//! Two quoting modes are available. `Minimal` wraps a field in double quotes
//! only when it contains a comma or a double quote, matching the historical
//! `function_calls.csv` format byte for byte. Fields with embedded newlines are
//! left bare in that mode, which strict CSV readers will split. `Strict` hands
//! quoting to the `csv` crate, which also quotes fields containing CR or LF.
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::errors::{ScanError, ScanResult};
use crate::results::CallRecord;

/// Column names, in output order
pub const HEADER: [&str; 5] = ["Filename", "Function Call", "Argument", "Tag", "Identifier"];

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "function_calls.csv";

/// How fields are quoted in the output table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotingMode {
    /// Quote only fields containing `,` or `"`
    #[default]
    Minimal,
    /// Quote whenever CSV requires it, including embedded line breaks
    Strict,
}

impl FromStr for QuotingMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "strict" => Ok(Self::Strict),
            other => Err(ScanError::invalid_config(format!(
                "unknown quoting mode '{}' (expected minimal or strict)",
                other
            ))),
        }
    }
}

/// Escapes one field under the minimal quoting rule
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if !field.contains([',', '"']) {
        return Cow::Borrowed(field);
    }
    Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
}

/// Serializes records as a CSV table
#[derive(Debug, Clone, Copy, Default)]
pub struct TableWriter {
    quoting: QuotingMode,
}

impl TableWriter {
    pub fn new(quoting: QuotingMode) -> Self {
        Self { quoting }
    }

    /// Writes the header and one row per record to `writer`
    pub fn write_to<W: Write>(&self, writer: W, records: &[CallRecord]) -> ScanResult<()> {
        match self.quoting {
            QuotingMode::Minimal => write_minimal(writer, records),
            QuotingMode::Strict => write_strict(writer, records),
        }
    }

    /// Creates (or truncates) the output file without writing to it.
    ///
    /// Callers open the output before scanning so an unwritable destination
    /// fails the run before any worker starts.
    pub fn create(path: &Path) -> ScanResult<File> {
        File::create(path).map_err(|e| ScanError::output_creation(path, e))
    }

    /// Creates `path` and writes the table into it
    pub fn write_file(&self, path: &Path, records: &[CallRecord]) -> ScanResult<()> {
        let file = Self::create(path)?;
        self.write_to(file, records)?;
        info!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

fn write_minimal<W: Write>(writer: W, records: &[CallRecord]) -> ScanResult<()> {
    let mut out = BufWriter::new(writer);
    writeln!(out, "{}", HEADER.join(","))?;
    for record in records {
        let row: Vec<Cow<'_, str>> = record.fields().into_iter().map(escape_field).collect();
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()?;
    Ok(())
}

fn write_strict<W: Write>(writer: W, records: &[CallRecord]) -> ScanResult<()> {
    let mut out = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    out.write_record(HEADER)?;
    for record in records {
        out.write_record(record.fields())?;
    }
    out.flush()?;
    Ok(())
}
