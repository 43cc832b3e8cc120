// Bounded rolling log of strike events (oldest evicted first)

use crate::models::StrikeEvent;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct StrikeLog {
    entries: VecDeque<StrikeEvent>,
    capacity: usize,
}

impl StrikeLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: StrikeEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// Last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<StrikeEvent> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
