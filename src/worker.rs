// Dispatcher loop: every tick read all nodes, sample health, aggregate, broadcast.
// Cycles never overlap; node readers and the aggregator are owned by the loop task.

use crate::aggregator::Aggregator;
use crate::config::AppConfig;
use crate::models::{NodeMap, Snapshot};
use crate::node_reader::NodeReader;
use crate::sysinfo_repo::SysinfoRepo;
use crate::transport::SnapshotSender;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tokio::sync::{oneshot, watch};
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Node readers in configured order.
pub fn node_readers(config: &AppConfig) -> Vec<NodeReader> {
    config
        .node_paths()
        .into_iter()
        .map(|(id, path)| NodeReader::new(id, path))
        .collect()
}

/// State, transport and shutdown for the worker.
pub struct WorkerDeps {
    pub readers: Vec<NodeReader>,
    pub aggregator: Aggregator,
    pub sysinfo_repo: Arc<SysinfoRepo>,
    pub sender: SnapshotSender,
    /// Latest snapshot for in-process observers.
    pub snapshot_tx: watch::Sender<Option<Snapshot>>,
    pub snapshots_sent_total: Arc<AtomicU64>,
    pub send_failures_total: Arc<AtomicU64>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Worker timing config.
pub struct WorkerConfig {
    pub interval_ms: u64,
    pub health_timeout_ms: u64,
    /// How often to log dispatcher stats (real seconds).
    pub stats_log_interval_secs: u64,
}

impl From<&AppConfig> for WorkerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            interval_ms: config.dispatcher.interval_ms,
            health_timeout_ms: config.dispatcher.health_timeout_ms,
            stats_log_interval_secs: config.dispatcher.stats_log_interval_secs,
        }
    }
}

/// One read-aggregate cycle. Health sampling is bounded by `health_timeout`; every node read
/// and the health sample complete before the aggregator runs.
pub async fn run_cycle(
    readers: &mut [NodeReader],
    aggregator: &mut Aggregator,
    sysinfo_repo: &SysinfoRepo,
    health_timeout: Duration,
) -> Snapshot {
    let now = SystemTime::now();
    let mut nodes = NodeMap::with_capacity(readers.len());
    for reader in readers.iter_mut() {
        let record = reader.read(now);
        nodes.insert(reader.node_id(), record);
    }
    let health = sysinfo_repo.sample_health(health_timeout).await;
    aggregator.aggregate(nodes, health)
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        mut readers,
        mut aggregator,
        sysinfo_repo,
        sender,
        snapshot_tx,
        snapshots_sent_total,
        send_failures_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        interval_ms,
        health_timeout_ms,
        stats_log_interval_secs,
    } = config;

    let health_timeout = Duration::from_millis(health_timeout_ms);
    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);
    let node_count = readers.len();

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick fires immediately; skip it so the stats line reports a full interval
        stats_log_tick.tick().await;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let snapshot = run_cycle(&mut readers, &mut aggregator, &sysinfo_repo, health_timeout).await;
                    tracing::debug!(
                        war_chest = snapshot.total_value,
                        progress_pct = snapshot.progress_pct,
                        active_nodes = snapshot.active_node_count,
                        avg_latency_ms = snapshot.avg_latency_ms,
                        strikes = snapshot.recent_strikes.len(),
                        "cycle aggregated"
                    );
                    if sender.broadcast(&snapshot).await {
                        snapshots_sent_total.fetch_add(1, Ordering::Relaxed);
                    } else {
                        send_failures_total.fetch_add(1, Ordering::Relaxed);
                    }
                    snapshot_tx.send_replace(Some(snapshot));
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    let latest = snapshot_tx.borrow().clone();
                    if let Some(s) = latest {
                        tracing::info!(
                            snapshots_sent_total = snapshots_sent_total.load(Ordering::Relaxed),
                            send_failures_total = send_failures_total.load(Ordering::Relaxed),
                            war_chest = s.total_value,
                            progress_pct = s.progress_pct,
                            active_nodes = s.active_node_count,
                            nodes = node_count,
                            avg_latency_ms = s.avg_latency_ms,
                            "dispatcher stats"
                        );
                    }
                }
            }
        }
    }
    .instrument(tracing::debug_span!("worker", interval_ms)))
}
