//! Output formatting helpers for CLI commands

use crate::monitor::{format_time_ago, EventKind, HealthEntry, MonitorEvent, OutageSnapshot, ServiceStatus};
use chrono::{Local, TimeZone};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// Colored label for a service status
pub fn status_label(status: ServiceStatus) -> ColoredString {
    match status {
        ServiceStatus::Operational => "Operational".green(),
        ServiceStatus::Degraded => "Degraded".yellow(),
        ServiceStatus::Down => "Down".red(),
        ServiceStatus::Unknown => "Unknown".dimmed(),
    }
}

fn event_label(kind: EventKind) -> ColoredString {
    match kind {
        EventKind::OutageDetected => kind.as_str().red(),
        EventKind::ServiceRecovered => kind.as_str().green(),
        EventKind::ErrorLogged => kind.as_str().normal(),
    }
}

fn local_time(timestamp_ms: i64, pattern: &str) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format(pattern).to_string(),
        None => "-".to_string(),
    }
}

/// Format current statuses as a table
pub fn format_status_table(entries: &[HealthEntry], now_ms: i64) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Status", "Message", "Error Code", "Region", "Updated"]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.service),
            Cell::new(status_label(entry.status)),
            Cell::new(&entry.message),
            Cell::new(entry.error_code.as_deref().unwrap_or("-")),
            Cell::new(entry.region.as_deref().unwrap_or("-")),
            Cell::new(format_time_ago(entry.timestamp, now_ms)),
        ]);
    }

    table.to_string()
}

/// Format events as a table, newest first
pub fn format_events_table(events: &[MonitorEvent]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Service", "Event", "Status", "Message"]);

    for event in events {
        table.add_row(vec![
            Cell::new(local_time(event.timestamp, "%Y-%m-%d %H:%M:%S")),
            Cell::new(event.service),
            Cell::new(event_label(event.event)),
            Cell::new(status_label(event.status)),
            Cell::new(&event.message),
        ]);
    }

    table.to_string()
}

/// One-line outage banner
pub fn format_banner(snapshot: &OutageSnapshot) -> String {
    let time = local_time(snapshot.checked_at.timestamp_millis(), "%H:%M:%S");
    if snapshot.has_active_outage {
        let affected: Vec<&str> = snapshot.dependencies.iter().map(|d| d.as_str()).collect();
        format!(
            "[{}] {} {}",
            time,
            "⚠️  Service issues detected:".yellow(),
            affected.join(", ")
        )
    } else {
        format!("[{}] {}", time, "✓ All tracked services operational".green())
    }
}
