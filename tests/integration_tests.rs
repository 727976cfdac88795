//! Integration tests for the netsweep scan engine

use std::time::Duration;

use tokio::net::TcpListener;

use netsweep::{OpenPair, ScanConfig, ScanEngine, ScanError};

async fn bind_local() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn quiet_config(hosts: Vec<String>, ports: Vec<u16>) -> ScanConfig {
    ScanConfig::new(hosts, ports)
        .with_timeout(Duration::from_millis(500))
        .with_workers(20)
        .with_print_open(false)
}

#[tokio::test]
async fn test_open_port_is_detected() {
    let (_listener, port) = bind_local().await;

    let config = quiet_config(vec!["127.0.0.1".to_string()], vec![port]);
    let report = ScanEngine::new(config).unwrap().scan().await.unwrap();

    assert_eq!(report.total_tasks, 1);
    assert_eq!(
        report.open_pairs,
        vec![OpenPair::new("127.0.0.1".to_string(), port)]
    );
}

#[tokio::test]
async fn test_closed_port_is_not_open() {
    // Bind then drop to find a port that is almost certainly closed.
    let (listener, port) = bind_local().await;
    drop(listener);

    let config = quiet_config(vec!["127.0.0.1".to_string()], vec![port]);
    let report = ScanEngine::new(config).unwrap().scan().await.unwrap();

    assert_eq!(report.total_tasks, 1);
    assert!(report.open_pairs.is_empty());
}

#[tokio::test]
async fn test_task_universe_is_hosts_times_ports() {
    let (_l1, open_port) = bind_local().await;
    let (closed, closed_port) = bind_local().await;
    drop(closed);

    let config = quiet_config(
        vec!["127.0.0.1".to_string(), "localhost".to_string()],
        vec![open_port, closed_port],
    );
    let report = ScanEngine::new(config).unwrap().scan().await.unwrap();

    // 2 hosts x 2 ports, every pair attempted exactly once
    assert_eq!(report.total_tasks, 4);
    // The bound port is open under both host names
    assert!(report
        .open_pairs
        .contains(&OpenPair::new("127.0.0.1".to_string(), open_port)));
    assert!(report
        .open_pairs
        .contains(&OpenPair::new("localhost".to_string(), open_port)));
}

#[tokio::test]
async fn test_all_probes_failing_completes_cleanly() {
    // Unresolvable hostname: every probe fails, none of them aborts the run.
    let config = quiet_config(
        vec!["does-not-exist.invalid".to_string()],
        vec![80, 443, 8080],
    );
    let report = ScanEngine::new(config).unwrap().scan().await.unwrap();

    assert_eq!(report.total_tasks, 3);
    assert!(report.open_pairs.is_empty());
}

#[tokio::test]
async fn test_result_is_sorted_by_host_then_port() {
    let (_l1, p1) = bind_local().await;
    let (_l2, p2) = bind_local().await;
    let (_l3, p3) = bind_local().await;

    let config = quiet_config(
        vec!["localhost".to_string(), "127.0.0.1".to_string()],
        vec![p2, p3, p1],
    );
    let report = ScanEngine::new(config).unwrap().scan().await.unwrap();

    assert_eq!(report.total_tasks, 6);
    assert_eq!(report.open_pairs.len(), 6);
    assert!(report
        .open_pairs
        .windows(2)
        .all(|pair| pair[0] <= pair[1]));
    // "127.0.0.1" sorts before "localhost"
    assert_eq!(report.open_pairs[0].host, "127.0.0.1");
    assert_eq!(report.open_pairs[5].host, "localhost");
}

#[tokio::test]
async fn test_prefilter_with_no_alive_hosts_yields_zero_tasks() {
    let config = quiet_config(vec!["does-not-exist.invalid".to_string()], vec![80])
        .with_ping_first(true);
    let report = ScanEngine::new(config).unwrap().scan().await.unwrap();

    assert_eq!(report.total_tasks, 0);
    assert!(report.open_pairs.is_empty());
}

#[tokio::test]
async fn test_engine_rejects_empty_inputs() {
    let config = ScanConfig::new(vec![], vec![80]);
    assert!(matches!(
        ScanEngine::new(config),
        Err(ScanError::EmptyTargetSpec)
    ));

    let config = ScanConfig::new(vec!["127.0.0.1".to_string()], vec![]);
    assert!(matches!(
        ScanEngine::new(config),
        Err(ScanError::EmptyPortSpec)
    ));
}

#[tokio::test]
async fn test_worker_pool_smaller_than_task_count() {
    // More tasks than workers: the semaphore must drain them all.
    let (_listener, port) = bind_local().await;

    let mut all_ports = vec![port];
    let mut closed = Vec::new();
    for _ in 0..7 {
        let (l, p) = bind_local().await;
        closed.push(l);
        all_ports.push(p);
    }
    drop(closed);

    let config = quiet_config(vec!["127.0.0.1".to_string()], all_ports).with_workers(2);
    let report = ScanEngine::new(config).unwrap().scan().await.unwrap();

    assert_eq!(report.total_tasks, 8);
    assert_eq!(
        report.open_pairs,
        vec![OpenPair::new("127.0.0.1".to_string(), port)]
    );
}
