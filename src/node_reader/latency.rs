// Rolling latency samples per node; jitter is the population std dev of the window

use std::collections::VecDeque;

/// Max samples kept per node.
pub const LATENCY_WINDOW: usize = 20;

#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self::new(LATENCY_WINDOW)
    }
}

impl LatencyWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Appends a sample, evicting the oldest once the window is full.
    pub fn push(&mut self, latency_ms: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(latency_ms);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Population standard deviation; 0 with fewer than two samples.
    pub fn jitter(&self) -> f64 {
        let n = self.samples.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.samples.iter().sum::<f64>() / n as f64;
        let variance = self.samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_is_zero_below_two_samples() {
        let mut w = LatencyWindow::default();
        assert_eq!(w.jitter(), 0.0);
        w.push(12.0);
        assert_eq!(w.jitter(), 0.0);
    }

    #[test]
    fn jitter_is_population_std_dev() {
        let mut w = LatencyWindow::default();
        for s in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            w.push(s);
        }
        assert!((w.jitter() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn window_evicts_oldest_past_capacity() {
        let mut w = LatencyWindow::new(3);
        w.push(100.0);
        w.push(1.0);
        w.push(1.0);
        assert!(w.jitter() > 0.0);
        w.push(1.0);
        assert_eq!(w.len(), 3);
        assert_eq!(w.jitter(), 0.0);
    }
}
