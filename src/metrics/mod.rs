//! # Metrics
//!
//! The monitor emits these through the `metrics` facade; they are only
//! collected once a recorder is installed.
//!
//! **Counters:**
//! - `healthwatch_errors_total{dependency, status}` - Recorded errors by verdict
//! - `healthwatch_transitions_total{dependency, event}` - Status changes
//!
//! **Gauges:**
//! - `healthwatch_dependencies_with_issues` - Dependencies currently down or degraded

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install a process-wide Prometheus recorder and register metric descriptions.
///
/// Can only succeed once per process.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    metrics::describe_counter!(
        "healthwatch_errors_total",
        "Errors recorded against a dependency, by classified status"
    );
    metrics::describe_counter!(
        "healthwatch_transitions_total",
        "Dependency status changes, by event kind"
    );
    metrics::describe_gauge!(
        "healthwatch_dependencies_with_issues",
        "Dependencies currently down or degraded"
    );
}
