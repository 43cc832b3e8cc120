// Host resource summary carried verbatim in every snapshot

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub ram_percent: f64,
    #[serde(default)]
    pub ram_used_gb: f64,
    #[serde(default)]
    pub ram_total_gb: f64,
    /// Set when sampling failed or timed out; all figures are zero in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SystemHealth {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
