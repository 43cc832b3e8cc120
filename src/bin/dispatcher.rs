use anyhow::Result;
use cauldron::aggregator::Aggregator;
use cauldron::sysinfo_repo::SysinfoRepo;
use cauldron::transport::{SnapshotSender, resolve_ipv4};
use cauldron::*;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::watch;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let app_config = config::AppConfig::load()?;
    let target = resolve_ipv4(
        &app_config.dispatcher.target_host,
        app_config.dispatcher.target_port,
    )
    .await?;
    let sender = SnapshotSender::bind(target).await?;

    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        target = %target,
        nodes = ?app_config.node_ids().collect::<Vec<_>>(),
        goal = app_config.war_chest.goal,
        interval_ms = app_config.dispatcher.interval_ms,
        "dispatcher online"
    );

    let (snapshot_tx, _snapshot_rx) = watch::channel(None);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            readers: worker::node_readers(&app_config),
            aggregator: Aggregator::new(&app_config.war_chest),
            sysinfo_repo: Arc::new(SysinfoRepo::new()),
            sender,
            snapshot_tx,
            snapshots_sent_total: Arc::new(AtomicU64::new(0)),
            send_failures_total: Arc::new(AtomicU64::new(0)),
            shutdown_rx,
        },
        worker::WorkerConfig::from(&app_config),
    );

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    worker_handle.await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
