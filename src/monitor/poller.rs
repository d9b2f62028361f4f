//! Periodic outage sampling for presentation layers.

use super::state::Dependency;
use super::HealthMonitor;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What a status banner needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutageSnapshot {
    pub has_active_outage: bool,
    /// Dependencies that are down or degraded, sorted
    pub dependencies: Vec<Dependency>,
    pub checked_at: DateTime<Utc>,
}

impl OutageSnapshot {
    /// Sample the monitor now.
    pub fn capture(monitor: &HealthMonitor) -> Self {
        let dependencies = monitor.dependencies_with_issues();
        Self {
            has_active_outage: !dependencies.is_empty(),
            dependencies,
            checked_at: Utc::now(),
        }
    }
}

/// Samples a monitor on a fixed interval and publishes the result.
pub struct OutagePoller {
    monitor: Arc<HealthMonitor>,
    interval: Duration,
}

impl OutagePoller {
    /// Poll at the monitor's configured `poll_interval_seconds`.
    pub fn new(monitor: Arc<HealthMonitor>) -> Self {
        let interval = Duration::from_secs(monitor.config().poll_interval_seconds.max(1));
        Self { monitor, interval }
    }

    /// Poll at `interval` instead. Clamped to at least 1 ms.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Start polling in the background.
    ///
    /// The receiver always holds the latest snapshot; it is notified only when
    /// the set of affected dependencies changes. The task exits when
    /// `cancel_token` is cancelled.
    pub fn start(
        self,
        cancel_token: CancellationToken,
    ) -> (JoinHandle<()>, watch::Receiver<OutageSnapshot>) {
        let (tx, rx) = watch::channel(OutageSnapshot::capture(&self.monitor));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_ms = self.interval.as_millis() as u64,
                "Outage poller started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Outage poller shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let snapshot = OutageSnapshot::capture(&self.monitor);
                        tx.send_if_modified(|current| {
                            let changed = current.dependencies != snapshot.dependencies;
                            if changed {
                                tracing::warn!(
                                    affected = ?snapshot.dependencies,
                                    "Outage state changed"
                                );
                            }
                            *current = snapshot;
                            changed
                        });
                        tracing::debug!("Outage poll completed");
                    }
                }
            }
        });

        (handle, rx)
    }
}
