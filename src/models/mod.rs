// Domain models: node documents, node records, strikes, health, snapshots

mod health;
mod node;
mod node_map;
mod snapshot;
mod strike;

pub use health::SystemHealth;
pub use node::{MAX_ABS_PNL, NO_ACTION, NodeDocument, NodeRecord, NodeStatus, pnl_in_range};
pub use node_map::NodeMap;
pub use snapshot::Snapshot;
pub use strike::StrikeEvent;

/// Rounds to `places` decimal places, half away from zero. Values too large to scale are
/// returned unchanged.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
