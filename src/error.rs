//! Error handling for the netsweep scanner
//!
//! Fatal configuration errors only. Per-probe failures (connect timeout,
//! refusal, unreachable host, failed ping) are not errors; they are the
//! normal "not-open" outcome and stay local to one task.

use thiserror::Error;

/// Main error type for scanning operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid target specification: {0}")]
    InvalidTargetSpec(String),

    #[error("Target specification resolved to zero hosts")]
    EmptyTargetSpec,

    #[error("Invalid port specification: {0}")]
    InvalidPortSpec(String),

    #[error("Port specification resolved to zero valid ports")]
    EmptyPortSpec,

    #[error("Unsupported output format: {0} (use a .csv or .json destination)")]
    UnsupportedOutputFormat(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
