//! Replay command implementation

use crate::cli::output::{format_events_table, format_status_table};
use crate::cli::trace::{load_trace, replay_all};
use crate::cli::{ReplayArgs, ReplayFormat};
use crate::config::HealthwatchConfig;
use crate::monitor::HealthMonitor;
use std::fmt::Write;

/// Handle `healthwatch replay`
///
/// The Prometheus recorder is process-wide, so `--format prometheus` can only be
/// used once per process.
pub async fn handle_replay(
    args: &ReplayArgs,
    config: &HealthwatchConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let records = load_trace(&args.trace)?;

    let prometheus = match args.format {
        ReplayFormat::Prometheus => Some(crate::metrics::install_prometheus_recorder()?),
        _ => None,
    };

    let monitor = HealthMonitor::new(config.monitor.clone());
    let summary = replay_all(&monitor, records).await;
    tracing::info!(
        calls = summary.total(),
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Trace replayed"
    );

    let output = match args.format {
        ReplayFormat::Report => monitor.format_report(),
        ReplayFormat::Json => monitor.export_json()?,
        ReplayFormat::Prometheus => prometheus.map(|handle| handle.render()).unwrap_or_default(),
        ReplayFormat::Table => {
            let mut statuses = monitor.all_statuses();
            statuses.sort_by_key(|entry| entry.service);
            let limit = args.events.unwrap_or(config.monitor.report_recent_events);
            let now = chrono::Utc::now().timestamp_millis();

            let mut output = String::new();
            writeln!(output, "{}", format_status_table(&statuses, now))?;
            writeln!(output)?;
            writeln!(output, "Recent Events:")?;
            writeln!(output, "{}", format_events_table(&monitor.events(Some(limit))))?;
            writeln!(output)?;
            write!(
                output,
                "Replayed {} calls ({} succeeded, {} failed)",
                summary.total(),
                summary.succeeded,
                summary.failed
            )?;
            output
        }
    };

    Ok(output)
}
