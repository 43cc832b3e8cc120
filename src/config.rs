use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub dispatcher: DispatcherConfig,
    pub nodes: Vec<NodeConfig>,
    pub war_chest: WarChestConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    pub target_host: String,
    pub target_port: u16,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Base directory for relative node document paths.
    pub status_dir: PathBuf,
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
    /// How often to log dispatcher stats (snapshots sent, war chest) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_interval_ms() -> u64 {
    500
}

fn default_health_timeout_ms() -> u64 {
    1000
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    /// Status document, relative to `dispatcher.status_dir` or absolute.
    pub file: PathBuf,
}

/// Whether a strike fires every cycle over threshold, or once per crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrikeTrigger {
    #[default]
    Level,
    Edge,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarChestConfig {
    pub goal: f64,
    pub strike_threshold: f64,
    #[serde(default)]
    pub strike_trigger: StrikeTrigger,
    #[serde(default = "default_strike_log_capacity")]
    pub strike_log_capacity: usize,
    /// Most recent strikes carried in each snapshot.
    #[serde(default = "default_strike_window")]
    pub strike_window: usize,
}

fn default_strike_log_capacity() -> usize {
    50
}

fn default_strike_window() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_listen_host")]
    pub listen_host: String,
    pub listen_port: u16,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: u64,
    /// Log destination; the dashboard owns the terminal, so logs are dropped when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_listen_host() -> String {
    "0.0.0.0".into()
}

fn default_poll_interval_ms() -> u64 {
    10
}

fn default_render_interval_ms() -> u64 {
    100
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Node ids in configured order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Resolved document path for each node, in configured order.
    pub fn node_paths(&self) -> Vec<(String, PathBuf)> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), self.dispatcher.status_dir.join(&n.file)))
            .collect()
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.dispatcher.target_host.is_empty(),
            "dispatcher.target_host must be non-empty"
        );
        anyhow::ensure!(
            self.dispatcher.target_port > 0,
            "dispatcher.target_port must be between 1 and 65535, got {}",
            self.dispatcher.target_port
        );
        anyhow::ensure!(
            self.dispatcher.interval_ms > 0,
            "dispatcher.interval_ms must be > 0, got {}",
            self.dispatcher.interval_ms
        );
        anyhow::ensure!(
            self.dispatcher.health_timeout_ms > 0,
            "dispatcher.health_timeout_ms must be > 0, got {}",
            self.dispatcher.health_timeout_ms
        );
        anyhow::ensure!(
            self.dispatcher.stats_log_interval_secs > 0,
            "dispatcher.stats_log_interval_secs must be > 0, got {}",
            self.dispatcher.stats_log_interval_secs
        );

        anyhow::ensure!(!self.nodes.is_empty(), "nodes must list at least one node");
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            anyhow::ensure!(!node.id.is_empty(), "nodes.id must be non-empty");
            anyhow::ensure!(
                !node.file.as_os_str().is_empty(),
                "nodes.file must be non-empty for node {}",
                node.id
            );
            anyhow::ensure!(
                seen.insert(node.id.as_str()),
                "nodes.id must be unique, got duplicate {}",
                node.id
            );
        }

        let wc = &self.war_chest;
        anyhow::ensure!(
            wc.goal.is_finite() && wc.goal > 0.0,
            "war_chest.goal must be > 0, got {}",
            wc.goal
        );
        anyhow::ensure!(
            wc.strike_threshold.is_finite() && wc.strike_threshold >= 0.0,
            "war_chest.strike_threshold must be >= 0, got {}",
            wc.strike_threshold
        );
        anyhow::ensure!(
            wc.strike_window > 0,
            "war_chest.strike_window must be > 0, got {}",
            wc.strike_window
        );
        anyhow::ensure!(
            wc.strike_log_capacity >= wc.strike_window,
            "war_chest.strike_log_capacity must be >= strike_window ({}), got {}",
            wc.strike_window,
            wc.strike_log_capacity
        );

        anyhow::ensure!(
            self.dashboard.listen_port > 0,
            "dashboard.listen_port must be between 1 and 65535, got {}",
            self.dashboard.listen_port
        );
        anyhow::ensure!(
            self.dashboard.poll_interval_ms > 0,
            "dashboard.poll_interval_ms must be > 0, got {}",
            self.dashboard.poll_interval_ms
        );
        anyhow::ensure!(
            self.dashboard.render_interval_ms > 0,
            "dashboard.render_interval_ms must be > 0, got {}",
            self.dashboard.render_interval_ms
        );
        Ok(())
    }
}
