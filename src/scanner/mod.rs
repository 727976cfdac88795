//! Scanner module containing the main scanning engine

pub mod engine;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub use engine::ScanEngine;

/// One independent probe: an immutable (host, port) pair.
/// The task universe is the Cartesian product of hosts and ports,
/// so pairs never repeat and the pair itself is the task identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTask {
    pub host: String,
    pub port: u16,
}

impl ProbeTask {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }
}

/// A (host, port) pair confirmed to accept a TCP connection
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpenPair {
    pub host: String,
    pub port: u16,
}

impl OpenPair {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }
}

impl std::fmt::Display for OpenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Final result of one scan run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Size of the task universe (hosts x ports)
    pub total_tasks: usize,

    /// Open pairs, sorted by (host, port) regardless of completion order
    pub open_pairs: Vec<OpenPair>,

    /// Total scan duration
    pub duration: Duration,
}

impl ScanReport {
    pub fn new(total_tasks: usize) -> Self {
        Self {
            total_tasks,
            open_pairs: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Sort open pairs for deterministic output
    pub fn sort_pairs(&mut self) {
        self.open_pairs.sort_unstable();
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }
}

/// Progress tracking for cadence reporting
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub start_time: Instant,
}

impl ScanProgress {
    pub fn new(total_tasks: usize) -> Self {
        Self {
            total_tasks,
            completed_tasks: 0,
            start_time: Instant::now(),
        }
    }

    pub fn update(&mut self, completed: usize) {
        self.completed_tasks = completed;
    }

    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        if self.total_tasks > 0 {
            (self.completed_tasks as f64 / self.total_tasks as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Get current probe completion rate in tasks per second
    pub fn current_rate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.completed_tasks as f64 / elapsed
        } else {
            0.0
        }
    }
}
