// Snapshot: the unit of broadcast, one per aggregation cycle

use serde::{Deserialize, Serialize};

use super::{NodeMap, NodeRecord, StrikeEvent, SystemHealth};

/// Aggregated view of every configured node plus host health and recent strikes.
///
/// Field names in Rust follow the domain; the wire keys follow the dashboard protocol
/// (`war_chest`, `war_chest_goal`, `active_nodes`, `system`, `strike_log`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub uptime_sec: f64,
    #[serde(rename = "war_chest")]
    pub total_value: f64,
    #[serde(rename = "war_chest_goal")]
    pub goal: f64,
    pub progress_pct: f64,
    pub nodes: NodeMap,
    #[serde(rename = "active_nodes")]
    pub active_node_count: usize,
    pub avg_latency_ms: f64,
    #[serde(rename = "system", default)]
    pub system_health: SystemHealth,
    /// Chronological (oldest first); display code reverses for newest-first.
    #[serde(rename = "strike_log", default)]
    pub recent_strikes: Vec<StrikeEvent>,
}

impl Snapshot {
    /// Pre-first-datagram view: every node WAITING, zero totals, no strikes.
    pub fn placeholder<'a>(
        node_ids: impl IntoIterator<Item = &'a str>,
        goal: f64,
        timestamp: String,
    ) -> Self {
        Self {
            timestamp,
            uptime_sec: 0.0,
            total_value: 0.0,
            goal,
            progress_pct: 0.0,
            nodes: node_ids
                .into_iter()
                .map(|id| (id.to_string(), NodeRecord::waiting()))
                .collect(),
            active_node_count: 0,
            avg_latency_ms: 0.0,
            system_health: SystemHealth::default(),
            recent_strikes: Vec::new(),
        }
    }
}
