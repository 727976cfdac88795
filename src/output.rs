//! Output formatting and export
//!
//! The destination's file extension selects the sink: `.csv` writes a
//! two-column delimited table with a header row, `.json` a structured
//! array of {host, port} records. No destination means console output.

use std::fs::File;
use std::path::Path;

use colored::*;

use crate::scanner::OpenPair;
use crate::{Result, ScanError};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Resolve the format from a destination path's extension.
    /// Fails with `UnsupportedOutputFormat` for anything else.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(OutputFormat::Csv),
            Some("json") => Ok(OutputFormat::Json),
            _ => Err(ScanError::UnsupportedOutputFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// Writes the final open-pairs collection to its destination
pub struct OutputManager;

impl OutputManager {
    /// Write the sorted open pairs to the destination file
    pub fn write_to_file(pairs: &[OpenPair], path: &Path) -> Result<()> {
        match OutputFormat::from_path(path)? {
            OutputFormat::Csv => Self::write_csv(pairs, path),
            OutputFormat::Json => Self::write_json(pairs, path),
        }
    }

    fn write_csv(pairs: &[OpenPair], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_io_error)?;
        writer.write_record(["host", "port"]).map_err(csv_io_error)?;
        for pair in pairs {
            writer
                .write_record([pair.host.as_str(), &pair.port.to_string()])
                .map_err(csv_io_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_json(pairs: &[OpenPair], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, pairs)
            .map_err(|e| ScanError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        Ok(())
    }

    /// Print the final listing to the console
    pub fn print_console(pairs: &[OpenPair]) {
        if pairs.is_empty() {
            println!("\n{}", "No open ports found.".yellow());
            return;
        }

        println!("\n{}", "Open ports:".bright_green().bold());
        for pair in pairs {
            println!("{}", pair);
        }
    }
}

fn csv_io_error(err: csv::Error) -> ScanError {
    ScanError::IoError(std::io::Error::new(std::io::ErrorKind::Other, err))
}
