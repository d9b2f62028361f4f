//! Export and text report for diagnostics.

use super::error::MonitorError;
use super::state::{Dependency, HealthEntry, MonitorEvent};
use super::HealthMonitor;
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Point-in-time copy of the monitor's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorExport {
    /// `(dependency, entry)` pairs
    pub service_status: Vec<(Dependency, HealthEntry)>,
    /// Event log, newest first
    pub maintenance_logs: Vec<MonitorEvent>,
    /// Export time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl HealthMonitor {
    /// Snapshot of all statuses and the full event log.
    pub fn export(&self) -> MonitorExport {
        let mut service_status: Vec<_> = self
            .all_statuses()
            .into_iter()
            .map(|entry| (entry.service, entry))
            .collect();
        service_status.sort_by_key(|(dependency, _)| *dependency);

        MonitorExport {
            service_status,
            maintenance_logs: self.events(None),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// [`export`](Self::export) serialized as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, MonitorError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Human-readable report: current status per dependency, then the most
    /// recent events (`report_recent_events` of them).
    pub fn format_report(&self) -> String {
        let mut statuses = self.all_statuses();
        statuses.sort_by_key(|entry| entry.service);
        let events = self.events(Some(self.config().report_recent_events));
        render_report(&statuses, &events)
    }
}

fn render_report(statuses: &[HealthEntry], events: &[MonitorEvent]) -> String {
    let mut output = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(output, "\n=== Service Maintenance Log ===\n");
    let _ = writeln!(output, "Current Service Status:");
    if statuses.is_empty() {
        let _ = writeln!(output, "  No services tracked yet");
    }
    for entry in statuses {
        let _ = writeln!(
            output,
            "  {} {}: {}",
            entry.status.glyph(),
            entry.service,
            entry.status.as_str().to_uppercase()
        );
        if !entry.message.is_empty() {
            let _ = writeln!(output, "     {}", entry.message);
        }
        if let Some(code) = &entry.error_code {
            let _ = writeln!(output, "     Error Code: {}", code);
        }
    }

    let _ = writeln!(output, "\nRecent Events:");
    if events.is_empty() {
        let _ = writeln!(output, "  No events logged");
    }
    for event in events {
        let _ = writeln!(
            output,
            "  {} [{}] {}: {}",
            event.event.glyph(),
            format_local_time(event.timestamp),
            event.service,
            event.message
        );
    }

    let _ = writeln!(output, "\n=================================");
    output
}

fn format_local_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

/// Relative age of a timestamp: `42s ago`, `5m ago`, `3h ago`, `2d ago`.
pub fn format_time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - timestamp_ms).max(0) / 1000;

    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}
