//! Failure classification.
//!
//! Maps an error code and message to a [`ServiceStatus`]. Rules are evaluated in
//! table order and the first match wins; a rule matches on either its codes or
//! its message patterns, so a message match in an earlier rule beats a code
//! match in a later one.

use super::state::ServiceStatus;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Service error codes with a known meaning. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InternalFailure,
    InternalServerError,
    ServiceUnavailable,
    ThrottlingException,
    RequestTimeout,
    Timeout,
    UnauthorizedException,
    AccessDenied,
    InvalidToken,
    NotFound,
    BadRequest,
}

impl ErrorCode {
    const ALL: [ErrorCode; 11] = [
        ErrorCode::InternalFailure,
        ErrorCode::InternalServerError,
        ErrorCode::ServiceUnavailable,
        ErrorCode::ThrottlingException,
        ErrorCode::RequestTimeout,
        ErrorCode::Timeout,
        ErrorCode::UnauthorizedException,
        ErrorCode::AccessDenied,
        ErrorCode::InvalidToken,
        ErrorCode::NotFound,
        ErrorCode::BadRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InternalFailure => "InternalFailure",
            ErrorCode::InternalServerError => "InternalServerError",
            ErrorCode::ServiceUnavailable => "ServiceUnavailable",
            ErrorCode::ThrottlingException => "ThrottlingException",
            ErrorCode::RequestTimeout => "RequestTimeout",
            ErrorCode::Timeout => "Timeout",
            ErrorCode::UnauthorizedException => "UnauthorizedException",
            ErrorCode::AccessDenied => "AccessDenied",
            ErrorCode::InvalidToken => "InvalidToken",
            ErrorCode::NotFound => "NotFound",
            ErrorCode::BadRequest => "BadRequest",
        }
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unrecognized error code: {}", s))
    }
}

/// Which rule produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Dependency is failing outright
    HardFailure,
    /// Dependency is slow or shedding load
    Transient,
    /// Caller was not allowed in; dependency is fine
    AccessRejected,
    /// Caller sent a bad request; dependency is fine
    ClientError,
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureCategory::HardFailure => "hard_failure",
            FailureCategory::Transient => "transient",
            FailureCategory::AccessRejected => "access_rejected",
            FailureCategory::ClientError => "client_error",
        };
        f.write_str(s)
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct ClassificationRule {
    pub category: FailureCategory,
    pub verdict: ServiceStatus,
    /// Exact codes (case-insensitive)
    pub codes: &'static [ErrorCode],
    /// Upper-case code prefixes
    pub code_prefixes: &'static [&'static str],
    /// Lower-case substrings searched for in the message
    pub message_patterns: &'static [&'static str],
}

impl ClassificationRule {
    fn matches(&self, code: Option<ErrorCode>, upper_code: &str, lower_message: &str) -> bool {
        code.is_some_and(|c| self.codes.contains(&c))
            || self
                .code_prefixes
                .iter()
                .any(|prefix| upper_code.starts_with(prefix))
            || self
                .message_patterns
                .iter()
                .any(|pattern| lower_message.contains(pattern))
    }
}

/// Classification rules in priority order.
pub const RULES: [ClassificationRule; 4] = [
    ClassificationRule {
        category: FailureCategory::HardFailure,
        verdict: ServiceStatus::Down,
        codes: &[
            ErrorCode::InternalFailure,
            ErrorCode::InternalServerError,
            ErrorCode::ServiceUnavailable,
        ],
        code_prefixes: &[],
        message_patterns: &["internal failure", "service unavailable", "reached max retries"],
    },
    ClassificationRule {
        category: FailureCategory::Transient,
        verdict: ServiceStatus::Degraded,
        codes: &[
            ErrorCode::ThrottlingException,
            ErrorCode::RequestTimeout,
            ErrorCode::Timeout,
        ],
        code_prefixes: &[],
        message_patterns: &["timeout", "throttl", "rate limit"],
    },
    ClassificationRule {
        category: FailureCategory::AccessRejected,
        verdict: ServiceStatus::Operational,
        codes: &[
            ErrorCode::UnauthorizedException,
            ErrorCode::AccessDenied,
            ErrorCode::InvalidToken,
        ],
        code_prefixes: &[],
        message_patterns: &["unauthorized", "access denied"],
    },
    ClassificationRule {
        category: FailureCategory::ClientError,
        verdict: ServiceStatus::Operational,
        codes: &[ErrorCode::NotFound, ErrorCode::BadRequest],
        code_prefixes: &["INVALID"],
        message_patterns: &["not found", "invalid"],
    },
];

/// Verdict plus the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: ServiceStatus,
    /// `None` when no rule matched
    pub category: Option<FailureCategory>,
}

/// Classify a failure and report which rule matched.
pub fn explain(code: &str, message: &str) -> Classification {
    let parsed = code.parse::<ErrorCode>().ok();
    let upper_code = code.to_ascii_uppercase();
    let lower_message = message.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(parsed, &upper_code, &lower_message))
        .map(|rule| Classification {
            status: rule.verdict,
            category: Some(rule.category),
        })
        .unwrap_or(Classification {
            status: ServiceStatus::Unknown,
            category: None,
        })
}

/// Classify a failure by its error code and message.
pub fn classify(code: &str, message: &str) -> ServiceStatus {
    explain(code, message).status
}
