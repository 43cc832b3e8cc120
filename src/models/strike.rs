// Strike events: threshold-crossing P&L moves

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeEvent {
    /// Local wall clock, `HH:MM:SS`.
    pub time: String,
    pub node: String,
    pub pnl: f64,
    pub action: String,
}
