// Aggregator: folds one cycle of node records + host health into a Snapshot and feeds the strike log.
// Owns all cross-cycle state on the sender side except per-node latency windows.

mod strike_log;

pub use strike_log::StrikeLog;

use crate::config::{StrikeTrigger, WarChestConfig};
use crate::models::{NodeMap, Snapshot, StrikeEvent, SystemHealth, pnl_in_range, round_to};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::time::{Duration, Instant};

pub struct Aggregator {
    goal: f64,
    strike_threshold: f64,
    strike_trigger: StrikeTrigger,
    strike_window: usize,
    strike_log: StrikeLog,
    /// Nodes over threshold last cycle (edge trigger only).
    armed_out: HashSet<String>,
    started_at: Instant,
}

impl Aggregator {
    pub fn new(config: &WarChestConfig) -> Self {
        Self {
            goal: config.goal,
            strike_threshold: config.strike_threshold,
            strike_trigger: config.strike_trigger,
            strike_window: config.strike_window,
            strike_log: StrikeLog::new(config.strike_log_capacity),
            armed_out: HashSet::new(),
            started_at: Instant::now(),
        }
    }

    pub fn strike_log(&self) -> &StrikeLog {
        &self.strike_log
    }

    /// Aggregates against the local wall clock and process uptime.
    pub fn aggregate(&mut self, nodes: NodeMap, health: SystemHealth) -> Snapshot {
        let now = chrono::Local::now().naive_local();
        let uptime = self.started_at.elapsed();
        self.aggregate_at(nodes, health, now, uptime)
    }

    /// Builds the snapshot for one cycle. Apart from `timestamp`/`uptime_sec` and the strike log
    /// append, the result depends only on `nodes`, `health` and the existing log.
    pub fn aggregate_at(
        &mut self,
        nodes: NodeMap,
        health: SystemHealth,
        now: NaiveDateTime,
        uptime: Duration,
    ) -> Snapshot {
        let mut total_value = 0.0;
        let mut total_latency = 0.0;
        let mut active = 0usize;
        let strike_time = now.format("%H:%M:%S").to_string();

        for (node_id, record) in nodes.iter() {
            if !record.is_active() {
                self.armed_out.remove(node_id);
                continue;
            }
            let pnl = record.pnl();
            total_latency += record.latency();
            active += 1;
            if !pnl_in_range(pnl) {
                // Node stays active but its P&L is left out of the war chest
                tracing::warn!(node = node_id, pnl, "pnl out of range; excluded from war chest");
                self.armed_out.remove(node_id);
                continue;
            }
            total_value += pnl;

            if pnl.abs() > self.strike_threshold {
                let fire = match self.strike_trigger {
                    StrikeTrigger::Level => true,
                    StrikeTrigger::Edge => self.armed_out.insert(node_id.to_string()),
                };
                if fire {
                    tracing::debug!(node = node_id, pnl, "strike");
                    self.strike_log.push(StrikeEvent {
                        time: strike_time.clone(),
                        node: node_id.to_string(),
                        pnl,
                        action: record.action().to_string(),
                    });
                }
            } else {
                self.armed_out.remove(node_id);
            }
        }

        let progress = (total_value / self.goal * 100.0).clamp(0.0, 100.0);
        let avg_latency = if active > 0 {
            total_latency / active as f64
        } else {
            0.0
        };

        Snapshot {
            timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            uptime_sec: round_to(uptime.as_secs_f64(), 1),
            total_value: round_to(total_value, 2),
            goal: self.goal,
            progress_pct: round_to(progress, 2),
            nodes,
            active_node_count: active,
            avg_latency_ms: round_to(avg_latency, 1),
            system_health: health,
            recent_strikes: self.strike_log.recent(self.strike_window),
        }
    }
}
