//! Recorded dependency calls.
//!
//! A trace is a JSON-lines file, one call outcome per line:
//!
//! ```text
//! {"dependency":"S3","outcome":"error","code":"ServiceUnavailable","message":"Service Unavailable","region":"us-east-1"}
//! {"dependency":"S3","outcome":"success"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::monitor::{Dependency, HealthMonitor, ServiceError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid trace record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOutcome {
    Success,
    Error,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub dependency: Dependency,
    pub outcome: TraceOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TraceRecord {
    /// The call's result as the wrapped operation would have returned it.
    fn into_result(self) -> Result<(), ServiceError> {
        match self.outcome {
            TraceOutcome::Success => Ok(()),
            TraceOutcome::Error => Err(ServiceError {
                code: self.code,
                message: self.message.unwrap_or_default(),
                details: self.details,
                ..Default::default()
            }),
        }
    }
}

/// Counts from a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl ReplaySummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub fn parse_trace(content: &str) -> Result<Vec<TraceRecord>, TraceError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| TraceError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}

pub fn load_trace(path: &Path) -> Result<Vec<TraceRecord>, TraceError> {
    let content = std::fs::read_to_string(path).map_err(|source| TraceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&content)
}

/// Drive one recorded call through the monitor's call wrapper.
pub async fn replay_record(monitor: &HealthMonitor, record: TraceRecord) -> Result<(), ServiceError> {
    let dependency = record.dependency;
    let region = record.region.clone();
    let result = record.into_result();

    monitor
        .monitored(dependency, region.as_deref(), || async move { result })
        .await
}

/// Replay every record in order.
pub async fn replay_all(monitor: &HealthMonitor, records: Vec<TraceRecord>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for record in records {
        match replay_record(monitor, record).await {
            Ok(()) => summary.succeeded += 1,
            Err(_) => summary.failed += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::ServiceStatus;

    const TRACE: &str = r#"
# captured during an S3 incident
{"dependency":"S3","outcome":"error","code":"ServiceUnavailable","message":"Service Unavailable","region":"us-east-1"}
{"dependency":"COGNITO","outcome":"error","code":"AccessDenied","message":"access denied"}

{"dependency":"S3","outcome":"success","region":"us-east-1"}
"#;

    #[test]
    fn test_parse_trace_skips_comments_and_blanks() {
        let records = parse_trace(TRACE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].dependency, Dependency::S3);
        assert_eq!(records[0].outcome, TraceOutcome::Error);
        assert_eq!(records[0].region.as_deref(), Some("us-east-1"));
        assert_eq!(records[2].outcome, TraceOutcome::Success);
    }

    #[test]
    fn test_parse_trace_reports_line_number() {
        let content = "{\"dependency\":\"S3\",\"outcome\":\"success\"}\n{\"dependency\":\"REDIS\",\"outcome\":\"success\"}";
        match parse_trace(content) {
            Err(TraceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_trace_missing_file() {
        let result = load_trace(Path::new("/nonexistent/trace.jsonl"));
        assert!(matches!(result, Err(TraceError::Read { .. })));
    }

    #[tokio::test]
    async fn test_replay_all_drives_monitor() {
        let monitor = HealthMonitor::default();
        let summary = replay_all(&monitor, parse_trace(TRACE).unwrap()).await;

        assert_eq!(summary, ReplaySummary { succeeded: 1, failed: 2 });
        assert_eq!(summary.total(), 3);
        assert_eq!(
            monitor.status(Dependency::S3).unwrap().status,
            ServiceStatus::Operational
        );
        assert_eq!(
            monitor.status(Dependency::Cognito).unwrap().status,
            ServiceStatus::Operational
        );
        assert!(!monitor.has_active_outage());
    }

    #[tokio::test]
    async fn test_replay_record_returns_annotated_error() {
        let monitor = HealthMonitor::default();
        let record = TraceRecord {
            dependency: Dependency::Bedrock,
            outcome: TraceOutcome::Error,
            region: None,
            code: Some("ThrottlingException".to_string()),
            message: Some("Too many requests".to_string()),
            details: None,
        };

        let err = replay_record(&monitor, record).await.unwrap_err();
        let health = err.health().unwrap();
        assert_eq!(health.service, Dependency::Bedrock);
        assert_eq!(health.service_status, ServiceStatus::Degraded);
    }
}
