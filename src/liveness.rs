//! ICMP liveness prefilter
//!
//! Best-effort reduction of the host list before port probing: each host
//! gets one system ping with a short timeout, run under its own capped
//! worker pool. A host that does not answer is dropped. Nothing in this
//! stage can fail the run; a ping that cannot even be spawned simply
//! counts as "not alive".

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::config::MAX_PING_WORKERS;

/// Probe one host with a single ICMP echo via the platform ping binary.
/// Any non-success exit status or execution error means "not alive".
pub async fn is_host_alive(host: &str, timeout: Duration) -> bool {
    let mut cmd = Command::new("ping");
    if cfg!(windows) {
        let wait_ms = timeout.as_millis().max(1000).to_string();
        cmd.args(["-n", "1", "-w", wait_ms.as_str()]);
    } else {
        let wait_secs = timeout.as_secs().max(1).to_string();
        cmd.args(["-c", "1", "-W", wait_secs.as_str()]);
    }
    cmd.arg(host).stdout(Stdio::null()).stderr(Stdio::null());

    match cmd.status().await {
        Ok(status) => status.success(),
        Err(e) => {
            log::debug!("ping invocation failed for {}: {}", host, e);
            false
        }
    }
}

/// Concurrently ping every host and keep the ones that answered.
///
/// The pool is capped at `min(workers, MAX_PING_WORKERS)` so a large
/// scan worker count cannot flood local ICMP resources. The returned
/// list carries no duplicates (one slot per input host) but its order
/// follows the input, not ping completion.
pub async fn filter_alive(hosts: &[String], timeout: Duration, workers: usize) -> Vec<String> {
    if hosts.is_empty() {
        return Vec::new();
    }

    let cap = workers.clamp(1, MAX_PING_WORKERS);
    let semaphore = Arc::new(Semaphore::new(cap));

    let mut handles = Vec::with_capacity(hosts.len());
    for host in hosts {
        let host = host.clone();
        let semaphore = semaphore.clone();
        handles.push(tokio::spawn(async move {
            // Semaphore is never closed while handles are alive.
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            if is_host_alive(&host, timeout).await {
                Some(host)
            } else {
                None
            }
        }));
    }

    let mut alive = Vec::new();
    for result in futures::future::join_all(handles).await {
        match result {
            Ok(Some(host)) => alive.push(host),
            Ok(None) => {}
            Err(e) => log::debug!("ping task panicked: {}", e),
        }
    }

    log::info!("liveness prefilter: {}/{} hosts alive", alive.len(), hosts.len());
    alive
}
