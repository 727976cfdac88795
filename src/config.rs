//! Configuration module for the netsweep scanner

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Worker-pool cadence: a progress line every this many completed probes,
/// plus one unconditionally at the final probe.
pub const PROGRESS_INTERVAL: usize = 100;

/// Upper bound on concurrent ping processes, independent of the
/// requested worker count.
pub const MAX_PING_WORKERS: usize = 200;

/// Main configuration structure for a scan run.
/// Partial TOML files are fine; missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Hosts to probe (already expanded from the target specification)
    pub hosts: Vec<String>,

    /// Ports to probe on every host, ascending and deduplicated
    pub ports: Vec<u16>,

    /// Timeout for each TCP connect attempt in milliseconds
    pub timeout_ms: u64,

    /// Number of concurrent probe workers
    pub workers: usize,

    /// Run the ICMP liveness prefilter before port scanning
    pub ping_first: bool,

    /// Print each open pair to the console as it is found
    pub print_open: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            ports: Vec::new(),
            timeout_ms: 500,
            workers: 200,
            ping_first: false,
            print_open: true,
        }
    }
}

impl ScanConfig {
    /// Create a configuration for the given hosts and ports
    pub fn new(hosts: Vec<String>, ports: Vec<u16>) -> Self {
        Self {
            hosts,
            ports,
            ..Default::default()
        }
    }

    /// Set the per-probe timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the worker pool size
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enable or disable the liveness prefilter
    pub fn with_ping_first(mut self, ping_first: bool) -> Self {
        self.ping_first = ping_first;
        self
    }

    /// Enable or disable real-time open-pair printing
    pub fn with_print_open(mut self, print_open: bool) -> Self {
        self.print_open = print_open;
        self
    }

    /// Get the probe timeout as a Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate the configuration before the engine starts
    pub fn validate(&self) -> crate::Result<()> {
        if self.hosts.is_empty() {
            return Err(crate::ScanError::EmptyTargetSpec);
        }
        if self.ports.is_empty() {
            return Err(crate::ScanError::EmptyPortSpec);
        }
        if self.workers == 0 {
            return Err(crate::ScanError::ConfigError(
                "worker count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration defaults from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| crate::ScanError::ConfigError(format!("failed to parse TOML: {}", e)))
    }

    /// Load defaults from ~/.netsweep.toml, falling back to built-ins.
    /// CLI flags are expected to override whatever this returns.
    pub fn load_default_config() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        let config_path = home_dir.join(".netsweep.toml");

        if config_path.exists() {
            if let Ok(config) = Self::from_toml_file(&config_path) {
                log::info!("loaded config defaults from {}", config_path.display());
                return config;
            }
        }

        Self::default()
    }
}
