//! Service health monitoring.
//!
//! Records the outcome of calls to backend dependencies, classifies failures,
//! tracks the latest status of each dependency and keeps a bounded log of
//! status changes and errors.

mod classifier;
mod config;
mod error;
mod events;
mod poller;
mod report;
mod state;
mod wrapper;


pub use classifier::*;
pub use config::*;
pub use error::*;
pub use events::EventLog;
pub use poller::{OutagePoller, OutageSnapshot};
pub use report::{format_time_ago, MonitorExport};
pub use state::*;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Tracks the health of every dependency the application calls.
///
/// Construct one per application and share it as `Arc<HealthMonitor>`. All
/// methods take `&self`; recordings for the same dependency are serialized and
/// the last one to complete wins.
///
/// # Examples
///
/// ```
/// use healthwatch::monitor::{Dependency, HealthMonitor, MonitorConfig, ServiceError, ServiceStatus};
///
/// let monitor = HealthMonitor::new(MonitorConfig::default());
///
/// let err = ServiceError::new("Rate exceeded").with_code("ThrottlingException");
/// let status = monitor.record_error(Dependency::DynamoDb, &err, Some("us-east-1"));
///
/// assert_eq!(status, ServiceStatus::Degraded);
/// assert!(monitor.has_active_outage());
///
/// monitor.record_success(Dependency::DynamoDb, None);
/// assert!(!monitor.has_active_outage());
/// ```
pub struct HealthMonitor {
    config: MonitorConfig,
    /// Latest entry per dependency
    statuses: DashMap<Dependency, HealthEntry>,
    /// Status changes and errors, newest first
    events: EventLog,
    sequence: AtomicU64,
}

impl HealthMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            events: EventLog::new(config.max_events),
            config,
            statuses: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Record a failed call and return the classified status.
    ///
    /// Overwrites the dependency's entry. Emits `outage_detected` or
    /// `service_recovered` when the status differs from the previous one (a
    /// dependency with no entry always differs), then always emits `error_logged`.
    pub fn record_error<E>(
        &self,
        dependency: Dependency,
        error: &E,
        region: Option<&str>,
    ) -> ServiceStatus
    where
        E: ObservedError + ?Sized,
    {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let error_code = error
            .error_code()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string());
        let message = match error.to_string() {
            m if m.is_empty() => UNKNOWN_ERROR_MESSAGE.to_string(),
            m => m,
        };
        let error_details = error.error_details();
        let region = region.map(str::to_string);
        let status = classify(&error_code, &message);

        // Hold the slot until both events are logged so recordings for the
        // same dependency cannot interleave.
        let slot = self.statuses.entry(dependency);
        let sequence = self.next_sequence();
        let entry = HealthEntry {
            service: dependency,
            status,
            message: message.clone(),
            timestamp,
            error_code: Some(error_code.clone()),
            error_details,
            region: region.clone(),
            sequence,
        };

        let (previous, guard) = match slot {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(entry).status;
                (Some(previous), occupied.into_ref())
            }
            Entry::Vacant(vacant) => (None, vacant.insert(entry)),
        };

        if previous != Some(status) {
            let kind = if status == ServiceStatus::Operational {
                EventKind::ServiceRecovered
            } else {
                EventKind::OutageDetected
            };
            self.events.push(MonitorEvent {
                timestamp,
                service: dependency,
                event: kind,
                status,
                message: message.clone(),
                error_code: Some(error_code.clone()),
                region: region.clone(),
                sequence,
            });

            metrics::counter!("healthwatch_transitions_total",
                "dependency" => dependency.as_str(),
                "event" => kind.as_str()
            )
            .increment(1);

            tracing::warn!(
                dependency = %dependency,
                old_status = ?previous,
                new_status = %status,
                "Dependency status changed"
            );
        }

        self.events.push(MonitorEvent {
            timestamp,
            service: dependency,
            event: EventKind::ErrorLogged,
            status,
            message: message.clone(),
            error_code: Some(error_code.clone()),
            region: region.clone(),
            sequence,
        });
        drop(guard);

        metrics::counter!("healthwatch_errors_total",
            "dependency" => dependency.as_str(),
            "status" => status.as_str()
        )
        .increment(1);
        self.publish_issue_gauge();

        tracing::error!(
            dependency = %dependency,
            status = %status,
            error_code = %error_code,
            region = region.as_deref(),
            message = %message,
            "Dependency call failed"
        );

        status
    }

    /// Record a successful call.
    ///
    /// Only a dependency that has an entry and is not already operational is
    /// changed: it becomes operational and a `service_recovered` event is
    /// logged. Anything else is a no-op, so a dependency with no history is
    /// never marked operational by a success alone.
    pub fn record_success(&self, dependency: Dependency, region: Option<&str>) {
        let Some(mut current) = self.statuses.get_mut(&dependency) else {
            return;
        };
        if current.status == ServiceStatus::Operational {
            return;
        }

        let previous = current.status;
        let timestamp = chrono::Utc::now().timestamp_millis();
        let sequence = self.next_sequence();
        let region = region.map(str::to_string);

        *current = HealthEntry {
            service: dependency,
            status: ServiceStatus::Operational,
            message: "Service recovered".to_string(),
            timestamp,
            error_code: None,
            error_details: None,
            region: region.clone(),
            sequence,
        };
        self.events.push(MonitorEvent {
            timestamp,
            service: dependency,
            event: EventKind::ServiceRecovered,
            status: ServiceStatus::Operational,
            message: "Service is now operational".to_string(),
            error_code: None,
            region,
            sequence,
        });
        drop(current);

        metrics::counter!("healthwatch_transitions_total",
            "dependency" => dependency.as_str(),
            "event" => EventKind::ServiceRecovered.as_str()
        )
        .increment(1);
        self.publish_issue_gauge();

        tracing::info!(
            dependency = %dependency,
            old_status = %previous,
            "Dependency recovered"
        );
    }

    /// Current entry for a dependency, if any call has been recorded for it.
    pub fn status(&self, dependency: Dependency) -> Option<HealthEntry> {
        self.statuses.get(&dependency).map(|entry| entry.value().clone())
    }

    /// Every recorded entry, in no particular order.
    pub fn all_statuses(&self) -> Vec<HealthEntry> {
        self.statuses
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Up to `limit` most recent events, newest first.
    pub fn events(&self, limit: Option<usize>) -> Vec<MonitorEvent> {
        self.events.recent(limit)
    }

    /// Up to `limit` most recent events for one dependency, newest first.
    pub fn events_for(&self, dependency: Dependency, limit: Option<usize>) -> Vec<MonitorEvent> {
        self.events.recent_for(dependency, limit)
    }

    /// True if any dependency is down or degraded.
    pub fn has_active_outage(&self) -> bool {
        self.statuses.iter().any(|entry| entry.status.is_outage())
    }

    /// Dependencies that are currently down or degraded, sorted.
    pub fn dependencies_with_issues(&self) -> Vec<Dependency> {
        let mut affected: Vec<Dependency> = self
            .statuses
            .iter()
            .filter(|entry| entry.status.is_outage())
            .map(|entry| *entry.key())
            .collect();
        affected.sort();
        affected
    }

    /// Empty the event log. Dependency statuses are kept.
    pub fn clear_events(&self) {
        self.events.clear();
    }

    fn publish_issue_gauge(&self) {
        let affected = self
            .statuses
            .iter()
            .filter(|entry| entry.status.is_outage())
            .count();
        metrics::gauge!("healthwatch_dependencies_with_issues").set(affected as f64);
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
