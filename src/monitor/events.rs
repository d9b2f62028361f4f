//! Bounded event log.
//!
//! Newest-first ring buffer of monitor events. The bound is enforced on every
//! insertion, so the log never holds more than `capacity` entries.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use super::state::{Dependency, MonitorEvent};

/// Ring buffer of monitor events, newest first.
pub struct EventLog {
    entries: RwLock<VecDeque<MonitorEvent>>,
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Inserts an event at the front, evicting the oldest if over capacity.
    pub fn push(&self, event: MonitorEvent) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(event);
        entries.truncate(self.capacity);
    }

    /// Up to `limit` most recent events, newest first. `None` returns all of them.
    pub fn recent(&self, limit: Option<usize>) -> Vec<MonitorEvent> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let limit = limit.unwrap_or(entries.len());
        entries.iter().take(limit).cloned().collect()
    }

    /// Like [`recent`](Self::recent), filtered to one dependency.
    pub fn recent_for(&self, dependency: Dependency, limit: Option<usize>) -> Vec<MonitorEvent> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let matching = entries.iter().filter(|e| e.service == dependency);
        match limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        }
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(super::config::DEFAULT_MAX_EVENTS)
    }
}
