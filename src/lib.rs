//! netsweep - a concurrent TCP reachability scanner
//!
//! Expands a target address space (CIDR, IP range, hosts file or single
//! host) against a port specification, probes every (host, port) pair
//! under a bounded worker pool and exports the open pairs.

pub mod config;
pub mod error;
pub mod liveness;
pub mod output;
pub mod ports;
pub mod scanner;
pub mod target;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::{ScanError, ScanResult};
pub use output::{OutputFormat, OutputManager};
pub use ports::parse_ports;
pub use scanner::engine::ScanEngine;
pub use scanner::{OpenPair, ScanReport};
pub use target::HostSpec;

pub type Result<T> = std::result::Result<T, ScanError>;
