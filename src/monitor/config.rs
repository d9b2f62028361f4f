//! Configuration for the health monitor.

use serde::{Deserialize, Serialize};

/// Default bound on the event log.
pub const DEFAULT_MAX_EVENTS: usize = 100;

/// Settings injected into a [`HealthMonitor`](super::HealthMonitor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Maximum number of events kept in the log
    pub max_events: usize,
    /// Number of recent events shown in the text report
    pub report_recent_events: usize,
    /// Seconds between outage poller samples
    pub poll_interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_events: DEFAULT_MAX_EVENTS,
            report_recent_events: 10,
            poll_interval_seconds: 5,
        }
    }
}
