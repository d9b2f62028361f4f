//! Dependency, status and event types tracked by the monitor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A backend subsystem the application depends on.
///
/// The set is closed: adding a dependency is a code change, not configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dependency {
    /// Request gateway in front of the compute layer
    #[serde(rename = "API_GATEWAY")]
    ApiGateway,
    /// Identity provider (sign-in, tokens)
    #[serde(rename = "COGNITO")]
    Cognito,
    /// Serverless compute
    #[serde(rename = "LAMBDA")]
    Lambda,
    /// Document/key-value data store
    #[serde(rename = "DYNAMODB")]
    DynamoDb,
    /// Object storage for uploads
    #[serde(rename = "S3")]
    S3,
    /// Model inference
    #[serde(rename = "BEDROCK")]
    Bedrock,
}

impl Dependency {
    /// Every known dependency, in declaration order.
    pub const ALL: [Dependency; 6] = [
        Dependency::ApiGateway,
        Dependency::Cognito,
        Dependency::Lambda,
        Dependency::DynamoDb,
        Dependency::S3,
        Dependency::Bedrock,
    ];

    /// Wire name of the dependency (e.g. `API_GATEWAY`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::ApiGateway => "API_GATEWAY",
            Dependency::Cognito => "COGNITO",
            Dependency::Lambda => "LAMBDA",
            Dependency::DynamoDb => "DYNAMODB",
            Dependency::S3 => "S3",
            Dependency::Bedrock => "BEDROCK",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dependency {
    type Err = String;

    /// Case-insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Dependency::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| format!("Unknown dependency: {}", s))
    }
}

/// Observed health of a dependency.
///
/// These are independent categories, not a severity scale. `Operational` is the
/// only healthy state; `Degraded` and `Down` are the states that raise alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Dependency is working (any error was the caller's fault)
    Operational,
    /// Dependency is slow or throttling
    Degraded,
    /// Dependency is unusable
    Down,
    /// Failure could not be classified
    Unknown,
}

impl ServiceStatus {
    /// True for the states that should raise an outage alert.
    pub fn is_outage(&self) -> bool {
        matches!(self, ServiceStatus::Down | ServiceStatus::Degraded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Operational => "operational",
            ServiceStatus::Degraded => "degraded",
            ServiceStatus::Down => "down",
            ServiceStatus::Unknown => "unknown",
        }
    }

    /// Glyph used in the plain-text report.
    pub fn glyph(&self) -> &'static str {
        match self {
            ServiceStatus::Operational => "✅",
            ServiceStatus::Degraded => "⚠️",
            ServiceStatus::Down => "❌",
            ServiceStatus::Unknown => "❓",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operational" => Ok(ServiceStatus::Operational),
            "degraded" => Ok(ServiceStatus::Degraded),
            "down" => Ok(ServiceStatus::Down),
            "unknown" => Ok(ServiceStatus::Unknown),
            _ => Err(format!("Invalid service status: {}", s)),
        }
    }
}

/// Latest known health of one dependency. Overwritten on every recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntry {
    /// Dependency this entry describes
    pub service: Dependency,
    pub status: ServiceStatus,
    /// Human-readable message (error message, or "Service recovered")
    pub message: String,
    /// Wall-clock milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Serialized diagnostic payload of the originating error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Increases with every recording. Only ordered against other
    /// recordings for the same dependency; across dependencies the event log
    /// may hold them out of sequence order.
    pub sequence: u64,
}

/// What a [`MonitorEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Status changed to something other than operational
    OutageDetected,
    /// Status changed to operational
    ServiceRecovered,
    /// An error was recorded (one per recorded error)
    ErrorLogged,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OutageDetected => "outage_detected",
            EventKind::ServiceRecovered => "service_recovered",
            EventKind::ErrorLogged => "error_logged",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            EventKind::ServiceRecovered => "✅",
            EventKind::OutageDetected => "🚨",
            EventKind::ErrorLogged => "📝",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry in the monitor's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorEvent {
    pub timestamp: i64,
    pub service: Dependency,
    pub event: EventKind,
    /// Status at the time of the event
    pub status: ServiceStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub sequence: u64,
}
