//! Watch command implementation

use crate::cli::output::format_banner;
use crate::cli::trace::{load_trace, replay_record};
use crate::cli::WatchArgs;
use crate::config::HealthwatchConfig;
use crate::monitor::{HealthMonitor, OutagePoller, OutageSnapshot};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Handle `healthwatch watch`
///
/// Replays the trace in the background, one call every `delay_ms`, while an
/// [`OutagePoller`] samples the monitor. A banner line is written whenever the
/// set of affected dependencies changes, plus a final one once the trace ends.
pub async fn handle_watch<W: Write>(
    args: &WatchArgs,
    config: &HealthwatchConfig,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_trace(&args.trace)?;
    let monitor = Arc::new(HealthMonitor::new(config.monitor.clone()));

    let interval = args
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(config.monitor.poll_interval_seconds));
    let cancel_token = CancellationToken::new();
    let (poller_handle, mut snapshots) = OutagePoller::new(Arc::clone(&monitor))
        .with_interval(interval)
        .start(cancel_token.clone());

    let delay = Duration::from_millis(args.delay_ms);
    let replay_monitor = Arc::clone(&monitor);
    let mut replay = tokio::spawn(async move {
        for record in records {
            // Failures are recorded by the monitor; nothing else to do with them here
            let _ = replay_record(&replay_monitor, record).await;
            tokio::time::sleep(delay).await;
        }
    });

    writeln!(out, "{}", format_banner(&snapshots.borrow_and_update()))?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = format_banner(&snapshots.borrow_and_update());
                writeln!(out, "{}", line)?;
            }
            finished = &mut replay => {
                finished?;
                break;
            }
        }
    }

    cancel_token.cancel();
    poller_handle.await?;

    writeln!(out, "{}", format_banner(&OutageSnapshot::capture(&monitor)))?;
    out.flush()?;
    Ok(())
}
