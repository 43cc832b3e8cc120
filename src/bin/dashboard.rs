use anyhow::Result;
use cauldron::transport::SnapshotReceiver;
use cauldron::*;

fn main() -> Result<()> {
    let app_config = config::AppConfig::load()?;
    logging::init_to_file(app_config.dashboard.log_file.as_deref())?;

    let listen = (
        app_config.dashboard.listen_host.as_str(),
        app_config.dashboard.listen_port,
    );
    let receiver = SnapshotReceiver::bind(listen).map_err(|e| {
        anyhow::anyhow!(
            "bind {}:{}: {}",
            app_config.dashboard.listen_host,
            app_config.dashboard.listen_port,
            e
        )
    })?;
    tracing::info!(
        version = version::VERSION,
        listen = %receiver.local_addr()?,
        "dashboard listening"
    );

    dashboard::run(&app_config, receiver)
}
