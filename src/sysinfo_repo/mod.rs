// Host health via sysinfo. Sampling never fails outward: timeouts and errors become a zeroed
// summary carrying the error text.

use crate::models::{SystemHealth, round_to};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sysinfo::System;
use tracing::instrument;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub struct SysinfoRepo {
    sys: Arc<Mutex<System>>,
    last_cpu_refresh: Arc<Mutex<Option<(Instant, f64)>>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            last_cpu_refresh: Arc::new(Mutex::new(None)),
        }
    }

    /// Samples CPU and RAM, giving up after `timeout`.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "sample_health"))]
    pub async fn sample_health(&self, timeout: Duration) -> SystemHealth {
        match tokio::time::timeout(timeout, self.get_health()).await {
            Ok(Ok(health)) => health,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, operation = "sample_health", "health sample failed");
                SystemHealth::unavailable(e.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    operation = "sample_health",
                    "health sample timed out"
                );
                SystemHealth::unavailable(format!("timed out after {}ms", timeout.as_millis()))
            }
        }
    }

    pub async fn get_health(&self) -> anyhow::Result<SystemHealth> {
        let sys = self.sys.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;

            let now = Instant::now();
            let cpu = {
                let mut guard = last_cpu_refresh
                    .lock()
                    .map_err(|e| anyhow::anyhow!("cpu baseline lock poisoned: {}", e))?;
                match *guard {
                    Some((prev_ts, prev_usage))
                        if now.duration_since(prev_ts) < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL =>
                    {
                        // Too soon for a meaningful delta; reuse without blocking
                        prev_usage
                    }
                    Some(_) => {
                        sys.refresh_cpu_all();
                        let usage = sys.global_cpu_usage() as f64;
                        *guard = Some((now, usage));
                        usage
                    }
                    None => {
                        // First call establishes the baseline
                        sys.refresh_cpu_all();
                        *guard = Some((now, 0.0));
                        0.0
                    }
                }
            };

            sys.refresh_memory();
            let total = sys.total_memory();
            let used = total.saturating_sub(sys.available_memory());
            let ram_percent = if total > 0 {
                (used as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            Ok(SystemHealth {
                cpu_percent: round_to(cpu.clamp(0.0, 100.0), 1),
                ram_percent: round_to(ram_percent, 1),
                ram_used_gb: round_to(used as f64 / BYTES_PER_GIB, 1),
                ram_total_gb: round_to(total as f64 / BYTES_PER_GIB, 1),
                error: None,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}
