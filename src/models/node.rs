// Per-node status: the external document schema and the normalized wire record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display placeholder for a node that has not reported an action.
pub const NO_ACTION: &str = "—";

/// Largest P&L magnitude a node may report. Keeps every derived total finite on the wire.
pub const MAX_ABS_PNL: f64 = 1e12;

pub fn pnl_in_range(pnl: f64) -> bool {
    pnl.is_finite() && pnl.abs() <= MAX_ABS_PNL
}

/// Node status as reported by the trading process; unknown strings pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeStatus {
    Running,
    Waiting,
    Offline,
    Unknown,
    Other(String),
}

impl NodeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            NodeStatus::Running => "RUNNING",
            NodeStatus::Waiting => "WAITING",
            NodeStatus::Offline => "OFFLINE",
            NodeStatus::Unknown => "UNKNOWN",
            NodeStatus::Other(s) => s,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, NodeStatus::Offline)
    }
}

impl From<String> for NodeStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "RUNNING" => NodeStatus::Running,
            "WAITING" => NodeStatus::Waiting,
            "OFFLINE" => NodeStatus::Offline,
            "UNKNOWN" => NodeStatus::Unknown,
            _ => NodeStatus::Other(s),
        }
    }
}

impl From<NodeStatus> for String {
    fn from(status: NodeStatus) -> Self {
        match status {
            NodeStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status document written by a trading node. Unrecognized fields are ignored.
///
/// | field         | default     |
/// |---------------|-------------|
/// | `status`      | `UNKNOWN`   |
/// | `last_action` | `—`         |
/// | `current_pnl` | `0`         |
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeDocument {
    #[serde(default = "default_status")]
    pub status: NodeStatus,
    #[serde(default = "default_action")]
    pub last_action: String,
    #[serde(default)]
    pub current_pnl: f64,
}

fn default_status() -> NodeStatus {
    NodeStatus::Unknown
}

fn default_action() -> String {
    NO_ACTION.to_string()
}

/// One node's entry in a snapshot. Offline and waiting records carry only `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_pnl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_jitter: Option<f64>,
}

impl NodeRecord {
    /// Sentinel for a node whose document is absent.
    pub fn offline() -> Self {
        Self::bare(NodeStatus::Offline)
    }

    /// Placeholder shown by the dashboard before the first datagram arrives.
    pub fn waiting() -> Self {
        Self::bare(NodeStatus::Waiting)
    }

    fn bare(status: NodeStatus) -> Self {
        Self {
            status,
            last_action: None,
            current_pnl: None,
            latency_ms: None,
            latency_jitter: None,
        }
    }

    /// Active nodes count toward the war chest, the latency average and the active count.
    pub fn is_active(&self) -> bool {
        !self.status.is_offline()
    }

    pub fn pnl(&self) -> f64 {
        self.current_pnl.unwrap_or(0.0)
    }

    pub fn latency(&self) -> f64 {
        self.latency_ms.unwrap_or(0.0)
    }

    pub fn jitter(&self) -> f64 {
        self.latency_jitter.unwrap_or(0.0)
    }

    pub fn action(&self) -> &str {
        self.last_action.as_deref().unwrap_or(NO_ACTION)
    }
}
