//! Main scanning engine implementation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use colored::*;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::timeout;

use crate::config::{ScanConfig, PROGRESS_INTERVAL};
use crate::liveness;
use crate::scanner::{OpenPair, ProbeTask, ScanProgress, ScanReport};

/// Main scanning engine: drains the (host, port) task universe through a
/// bounded pool of connect probes, optionally preceded by the liveness
/// prefilter phase.
pub struct ScanEngine {
    config: ScanConfig,
}

impl ScanEngine {
    /// Create a new scan engine with the given configuration
    pub fn new(config: ScanConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Probe every (host, port) pair and return the sorted open pairs.
    ///
    /// Each probe outcome is recorded independently; a timeout, refusal
    /// or resolution failure is the normal "not-open" result and never
    /// aborts the run. The report is only returned once every task has
    /// completed or exhausted its timeout.
    pub async fn scan(&self) -> crate::Result<ScanReport> {
        let start_time = Instant::now();

        // Phase one: optional liveness prefilter. An all-dead host list
        // yields a zero-task scan, not an error.
        let hosts = if self.config.ping_first {
            let ping_timeout = self.config.timeout_duration().max(std::time::Duration::from_secs(1));
            liveness::filter_alive(&self.config.hosts, ping_timeout, self.config.workers).await
        } else {
            self.config.hosts.clone()
        };

        let tasks: Vec<ProbeTask> = hosts
            .iter()
            .flat_map(|host| {
                self.config
                    .ports
                    .iter()
                    .map(|&port| ProbeTask::new(host.clone(), port))
            })
            .collect();

        let total = tasks.len();
        let mut report = ScanReport::new(total);

        // Zero tasks: nothing to spawn, report zero completions.
        if total == 0 {
            return Ok(report);
        }

        log::info!(
            "scanning {} port(s) on {} host(s): {} probes, {} workers",
            self.config.ports.len(),
            hosts.len(),
            total,
            self.config.workers
        );

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let open_pairs = Arc::new(Mutex::new(Vec::new()));
        let completed = Arc::new(AtomicUsize::new(0));
        let probe_timeout = self.config.timeout_duration();
        let print_open = self.config.print_open;

        let mut handles = Vec::with_capacity(total);
        for task in tasks {
            let semaphore = semaphore.clone();
            let open_pairs = open_pairs.clone();
            let completed = completed.clone();

            handles.push(tokio::spawn(async move {
                // Semaphore lives as long as every handle; acquire cannot fail.
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");

                let is_open = probe_port(&task.host, task.port, probe_timeout).await;
                if is_open {
                    if print_open {
                        println!(
                            "{} {}:{} open",
                            "[+]".bright_green(),
                            task.host,
                            task.port
                        );
                    }
                    let mut pairs = open_pairs.lock().await;
                    pairs.push(OpenPair::new(task.host, task.port));
                }

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if done % PROGRESS_INTERVAL == 0 || done == total {
                    log::info!("progress: {}/{}", done, total);
                }
            }));
        }

        let mut progress = ScanProgress::new(total);
        for handle in handles {
            // A panicked probe task still counted as attempted; the
            // join error is logged, never propagated.
            if let Err(e) = handle.await {
                log::error!("probe task failed: {}", e);
            }
        }
        progress.update(completed.load(Ordering::SeqCst));
        log::debug!(
            "scan finished at {:.0} probes/sec",
            progress.current_rate()
        );

        report.open_pairs = {
            let mut pairs = open_pairs.lock().await;
            std::mem::take(&mut *pairs)
        };
        report.sort_pairs();
        report.set_duration(start_time.elapsed());

        Ok(report)
    }
}

/// Attempt a TCP connect to (host, port) within the timeout.
/// Every failure category collapses to `false`.
async fn probe_port(host: &str, port: u16, limit: std::time::Duration) -> bool {
    match timeout(limit, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(_)) => false,
        Err(_) => false,
    }
}
