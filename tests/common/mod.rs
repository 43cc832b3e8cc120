// Shared test helpers
#![allow(dead_code)]

use cauldron::config::{StrikeTrigger, WarChestConfig};
use cauldron::models::*;
use chrono::{NaiveDate, NaiveDateTime};

pub fn war_chest(strike_threshold: f64, strike_trigger: StrikeTrigger) -> WarChestConfig {
    WarChestConfig {
        goal: 100_000.0,
        strike_threshold,
        strike_trigger,
        strike_log_capacity: 50,
        strike_window: 10,
    }
}

pub fn running(pnl: f64, latency_ms: f64, action: &str) -> NodeRecord {
    NodeRecord {
        status: NodeStatus::Running,
        last_action: Some(action.into()),
        current_pnl: Some(pnl),
        latency_ms: Some(latency_ms),
        latency_jitter: Some(0.0),
    }
}

pub fn node_map(entries: Vec<(&str, NodeRecord)>) -> NodeMap {
    entries
        .into_iter()
        .map(|(id, r)| (id.to_string(), r))
        .collect()
}

pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .unwrap()
}

/// The three-node sample from the dashboard test sender.
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        timestamp: "2026-10-19T12:00:00.000000".into(),
        uptime_sec: 3661.0,
        total_value: 25000.5,
        goal: 100_000.0,
        progress_pct: 25.0,
        nodes: node_map(vec![
            ("node_1", running(8500.0, 5.2, "BUY XAUUSD")),
            ("node_2", running(9200.5, 6.8, "HOLD")),
            ("node_3", running(7300.0, 4.5, "TP1 hit")),
        ]),
        active_node_count: 3,
        avg_latency_ms: 5.5,
        system_health: SystemHealth {
            cpu_percent: 23.5,
            ram_percent: 45.2,
            ram_used_gb: 7.2,
            ram_total_gb: 16.0,
            error: None,
        },
        recent_strikes: vec![StrikeEvent {
            time: "11:59:58".into(),
            node: "node_2".into(),
            pnl: 1500.0,
            action: "3-SD wall bounce".into(),
        }],
    }
}
