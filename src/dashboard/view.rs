// Dashboard display helpers: pure text and classification over snapshot fields

use std::time::Duration;

use crate::models::{Snapshot, StrikeEvent};

/// Latency classification used by the pulse sync meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyGrade {
    Optimal,
    Nominal,
    Degraded,
}

impl LatencyGrade {
    pub fn of(latency_ms: f64) -> Self {
        if latency_ms < 10.0 {
            LatencyGrade::Optimal
        } else if latency_ms < 50.0 {
            LatencyGrade::Nominal
        } else {
            LatencyGrade::Degraded
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LatencyGrade::Optimal => "OPTIMAL",
            LatencyGrade::Nominal => "NOMINAL",
            LatencyGrade::Degraded => "DEGRADED",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            LatencyGrade::Optimal => "●",
            LatencyGrade::Nominal => "◐",
            LatencyGrade::Degraded => "○",
        }
    }
}

/// State of the datagram link as seen by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing received yet; showing the placeholder.
    NoLink,
    Live,
    /// Last snapshot is older than the staleness window.
    Stale,
}

/// Broadcast periods that may pass silently before the link is STALE.
pub const MISSED_PERIODS: u32 = 3;

/// Staleness window for a sender broadcasting every `broadcast_interval`.
pub fn stale_after(broadcast_interval: Duration) -> Duration {
    broadcast_interval * MISSED_PERIODS
}

impl LinkState {
    pub fn of(since_last: Option<Duration>, stale_after: Duration) -> Self {
        match since_last {
            None => LinkState::NoLink,
            Some(d) if d > stale_after => LinkState::Stale,
            Some(_) => LinkState::Live,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LinkState::NoLink => "NO LINK",
            LinkState::Live => "LIVE",
            LinkState::Stale => "STALE",
        }
    }
}

/// `HH:MM:SS`; hours are not wrapped at 24.
pub fn format_uptime(uptime_sec: f64) -> String {
    let total = if uptime_sec.is_finite() && uptime_sec > 0.0 {
        uptime_sec as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Groups the integer part with commas: `25000.5` with 2 places -> `25,000.50`.
pub fn format_amount(value: f64, places: usize) -> String {
    let formatted = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{}${}.{}", sign, grouped, f),
        None => format!("{}${}", sign, grouped),
    }
}

/// Signed currency: `+$1,500` / `-$250.25`.
pub fn format_signed(value: f64, places: usize) -> String {
    let body = format_amount(value, places);
    if body.starts_with('-') {
        body
    } else {
        format!("+{}", body)
    }
}

/// Number of filled cells for a percentage bar of `width` cells.
pub fn bar_fill(percent: f64, width: usize) -> usize {
    let p = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    ((width as f64) * p / 100.0) as usize
}

/// Strikes for display, newest first.
pub fn strikes_newest_first(snapshot: &Snapshot) -> impl Iterator<Item = &StrikeEvent> {
    snapshot.recent_strikes.iter().rev()
}

/// Truncates to at most `max` characters.
pub fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formats_hours_minutes_seconds() {
        assert_eq!(format_uptime(3661.0), "01:01:01");
        assert_eq!(format_uptime(0.0), "00:00:00");
        assert_eq!(format_uptime(-5.0), "00:00:00");
        assert_eq!(format_uptime(90061.9), "25:01:01");
    }

    #[test]
    fn latency_grades() {
        assert_eq!(LatencyGrade::of(5.2), LatencyGrade::Optimal);
        assert_eq!(LatencyGrade::of(10.0), LatencyGrade::Nominal);
        assert_eq!(LatencyGrade::of(49.9), LatencyGrade::Nominal);
        assert_eq!(LatencyGrade::of(50.0), LatencyGrade::Degraded);
        assert_eq!(LatencyGrade::of(5.2).icon(), "●");
    }

    #[test]
    fn link_state_thresholds() {
        let window = stale_after(Duration::from_millis(500));
        assert_eq!(window, Duration::from_millis(1500));
        assert_eq!(LinkState::of(None, window), LinkState::NoLink);
        assert_eq!(LinkState::of(Some(Duration::from_millis(200)), window), LinkState::Live);
        assert_eq!(LinkState::of(Some(Duration::from_secs(5)), window), LinkState::Stale);
        // A slow sender is still live between datagrams
        let slow = stale_after(Duration::from_secs(2));
        assert_eq!(LinkState::of(Some(Duration::from_secs(2)), slow), LinkState::Live);
    }

    #[test]
    fn amounts_are_grouped_and_signed() {
        assert_eq!(format_amount(25000.5, 2), "$25,000.50");
        assert_eq!(format_amount(100000.0, 0), "$100,000");
        assert_eq!(format_amount(999.0, 0), "$999");
        assert_eq!(format_signed(1500.0, 0), "+$1,500");
        assert_eq!(format_signed(-250.25, 2), "-$250.25");
        assert_eq!(format_signed(-0.001, 2), "+$0.00");
    }

    #[test]
    fn bar_fill_is_clamped() {
        assert_eq!(bar_fill(25.0, 40), 10);
        assert_eq!(bar_fill(150.0, 40), 40);
        assert_eq!(bar_fill(-3.0, 40), 0);
        assert_eq!(bar_fill(f64::NAN, 40), 0);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("HOLD — thesis intact", 6), "HOLD —");
        assert_eq!(truncate("BUY", 25), "BUY");
    }
}
