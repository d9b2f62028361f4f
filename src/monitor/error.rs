//! Error types for the health monitor, and the seam through which observed
//! failures are fed into it.

use super::state::{Dependency, ServiceStatus};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Errors produced by the monitor itself.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Export could not be serialized
    #[error("failed to serialize monitor export: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Diagnostic fields attached to an error after the monitor has recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAnnotation {
    pub service: Dependency,
    pub service_status: ServiceStatus,
}

/// A failure observed while calling a dependency.
///
/// The message is taken from `Display`. Implementors that carry a service error
/// code should return it from [`error_code`](ObservedError::error_code) so the
/// classifier can use it.
pub trait ObservedError: std::error::Error {
    /// Machine-readable error code reported by the dependency.
    fn error_code(&self) -> Option<String> {
        None
    }

    /// Serialized diagnostic payload stored alongside the health entry.
    fn error_details(&self) -> Option<String> {
        Some(format!("{:?}", self))
    }

    /// Called by the call wrapper once the error has been classified.
    ///
    /// Error types with nowhere to store the annotation keep the default no-op.
    fn annotate(&mut self, _annotation: HealthAnnotation) {}
}

/// Structured error returned by a remote service call.
///
/// `code` takes precedence over `name` when the classifier looks for an error
/// code, matching how SDK errors expose either field.
#[derive(Debug, Clone, PartialEq, Default, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ServiceError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Raw response payload, if the service returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthAnnotation>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Annotation attached by the call wrapper, if this error passed through it.
    pub fn health(&self) -> Option<HealthAnnotation> {
        self.health
    }
}

impl ObservedError for ServiceError {
    fn error_code(&self) -> Option<String> {
        [&self.code, &self.name]
            .into_iter()
            .flatten()
            .find(|c| !c.is_empty())
            .cloned()
    }

    fn error_details(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }

    fn annotate(&mut self, annotation: HealthAnnotation) {
        self.health = Some(annotation);
    }
}

/// Local I/O failures are mapped onto the service codes the classifier knows.
impl ObservedError for io::Error {
    fn error_code(&self) -> Option<String> {
        let code = match self.kind() {
            io::ErrorKind::TimedOut => "Timeout",
            io::ErrorKind::PermissionDenied => "AccessDenied",
            io::ErrorKind::NotFound => "NotFound",
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => "BadRequest",
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected => "ServiceUnavailable",
            _ => return None,
        };
        Some(code.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MonitorError::from(json_err);
        assert!(err
            .to_string()
            .starts_with("failed to serialize monitor export:"));
    }

    #[test]
    fn test_service_error_display_is_message() {
        let err = ServiceError::new("Rate exceeded").with_code("ThrottlingException");
        assert_eq!(err.to_string(), "Rate exceeded");
    }

    #[test]
    fn test_service_error_code_prefers_code_over_name() {
        let err = ServiceError::new("boom")
            .with_code("InternalFailure")
            .with_name("ServerError");
        assert_eq!(err.error_code().as_deref(), Some("InternalFailure"));

        let err = ServiceError::new("boom").with_name("NotAuthorizedException");
        assert_eq!(err.error_code().as_deref(), Some("NotAuthorizedException"));

        let err = ServiceError::new("boom").with_code("");
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn test_service_error_details_are_json() {
        let err = ServiceError::new("bucket missing")
            .with_code("NoSuchBucket")
            .with_details(serde_json::json!({"bucket": "uploads"}));

        let details = err.error_details().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&details).unwrap();
        assert_eq!(parsed["code"], "NoSuchBucket");
        assert_eq!(parsed["details"]["bucket"], "uploads");
    }

    #[test]
    fn test_service_error_annotate() {
        let mut err = ServiceError::new("down");
        assert!(err.health().is_none());

        err.annotate(HealthAnnotation {
            service: Dependency::Lambda,
            service_status: ServiceStatus::Down,
        });

        let health = err.health().unwrap();
        assert_eq!(health.service, Dependency::Lambda);
        assert_eq!(health.service_status, ServiceStatus::Down);
    }

    #[test]
    fn test_io_error_codes() {
        let err = io::Error::new(io::ErrorKind::TimedOut, "slow");
        assert_eq!(err.error_code().as_deref(), Some("Timeout"));

        let err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(err.error_code().as_deref(), Some("ServiceUnavailable"));

        let err = io::Error::new(io::ErrorKind::Other, "???");
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn test_io_error_annotate_is_noop() {
        let mut err = io::Error::new(io::ErrorKind::Other, "x");
        err.annotate(HealthAnnotation {
            service: Dependency::S3,
            service_status: ServiceStatus::Unknown,
        });
        assert_eq!(err.to_string(), "x");
    }
}
