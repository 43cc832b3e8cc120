// Worker tests: full read-aggregate-broadcast cycles against real files and a loopback receiver

mod common;

use cauldron::aggregator::Aggregator;
use cauldron::config::AppConfig;
use cauldron::models::*;
use cauldron::sysinfo_repo::SysinfoRepo;
use cauldron::transport::{SnapshotReceiver, SnapshotSender};
use cauldron::worker::{self, WorkerConfig, WorkerDeps};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{oneshot, watch};

fn config_for(status_dir: &Path) -> AppConfig {
    AppConfig::load_from_str(&format!(
        r#"
[dispatcher]
target_host = "127.0.0.1"
target_port = 9999
interval_ms = 25
status_dir = "{}"

[[nodes]]
id = "node_1"
file = "node_1.json"

[[nodes]]
id = "node_2"
file = "node_2.json"

[[nodes]]
id = "node_3"
file = "node_3.json"

[war_chest]
goal = 100000
strike_threshold = 1000.0

[dashboard]
listen_port = 9999
"#,
        status_dir.display()
    ))
    .unwrap()
}

fn write_node(dir: &Path, id: &str, pnl: f64) {
    let doc = format!(
        r#"{{"status": "RUNNING", "last_action": "HOLD {}", "current_pnl": {}}}"#,
        id, pnl
    );
    std::fs::write(dir.join(format!("{}.json", id)), doc).unwrap();
}

#[tokio::test]
async fn run_cycle_reads_every_node_in_order() {
    let dir = tempfile::TempDir::new().unwrap();
    write_node(dir.path(), "node_1", 8500.0);
    write_node(dir.path(), "node_2", 9200.5);
    // node_3 never wrote its file
    let config = config_for(dir.path());

    let mut readers = worker::node_readers(&config);
    let mut aggregator = Aggregator::new(&config.war_chest);
    let repo = SysinfoRepo::new();
    let snapshot =
        worker::run_cycle(&mut readers, &mut aggregator, &repo, Duration::from_secs(5)).await;

    assert_eq!(
        snapshot.nodes.ids().collect::<Vec<_>>(),
        vec!["node_1", "node_2", "node_3"]
    );
    assert_eq!(snapshot.total_value, 17700.5);
    assert_eq!(snapshot.active_node_count, 2);
    assert_eq!(snapshot.nodes.get("node_3"), Some(&NodeRecord::offline()));
    assert_eq!(snapshot.recent_strikes.len(), 2);
    let health = &snapshot.system_health;
    assert!((0.0..=100.0).contains(&health.cpu_percent));
    assert!((0.0..=100.0).contains(&health.ram_percent));
}

#[tokio::test]
async fn worker_broadcasts_until_shutdown() {
    let dir = tempfile::TempDir::new().unwrap();
    write_node(dir.path(), "node_1", 100.0);
    write_node(dir.path(), "node_2", 200.0);
    write_node(dir.path(), "node_3", 300.0);
    let config = config_for(dir.path());

    let mut receiver = SnapshotReceiver::bind(("127.0.0.1", 0)).unwrap();
    let sender = SnapshotSender::bind(receiver.local_addr().unwrap())
        .await
        .unwrap();
    let (snapshot_tx, mut snapshot_rx) = watch::channel(None);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let sent_total = Arc::new(AtomicU64::new(0));

    let handle = worker::spawn(
        WorkerDeps {
            readers: worker::node_readers(&config),
            aggregator: Aggregator::new(&config.war_chest),
            sysinfo_repo: Arc::new(SysinfoRepo::new()),
            sender,
            snapshot_tx,
            snapshots_sent_total: sent_total.clone(),
            send_failures_total: Arc::new(AtomicU64::new(0)),
            shutdown_rx,
        },
        WorkerConfig::from(&config),
    );

    tokio::time::timeout(Duration::from_secs(5), snapshot_rx.changed())
        .await
        .unwrap()
        .unwrap();
    let published = snapshot_rx.borrow().clone().unwrap();
    assert_eq!(published.total_value, 600.0);
    assert_eq!(published.active_node_count, 3);

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    let mut received = None;
    while received.is_none() && std::time::Instant::now() < deadline {
        received = receiver.try_receive_latest();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let received = received.unwrap();
    assert_eq!(received.total_value, 600.0);
    assert_eq!(received.goal, 100_000.0);

    // A node going dark shows up on a later cycle
    std::fs::remove_file(dir.path().join("node_2.json")).unwrap();
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    let mut offline_seen = false;
    while !offline_seen && std::time::Instant::now() < deadline {
        if let Some(s) = receiver.try_receive_latest() {
            offline_seen = s.active_node_count == 2
                && s.nodes.get("node_2").map(|r| r.status.is_offline()) == Some(true);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(offline_seen);

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(sent_total.load(Ordering::Relaxed) >= 2);
}
