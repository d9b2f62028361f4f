//! Configuration module for healthwatch
//!
//! Configuration is only read by the command-line front end; the monitor
//! itself receives a [`MonitorConfig`] value.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`HEALTHWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use healthwatch::config::HealthwatchConfig;
//!
//! let toml = r#"
//! [monitor]
//! max_events = 250
//! "#;
//! let config: HealthwatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.monitor.max_events, 250);
//! assert_eq!(config.monitor.report_recent_events, 10);
//! ```

pub mod error;
pub mod logging;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

pub use crate::monitor::MonitorConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Example configuration written by `healthwatch config init`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../healthwatch.example.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealthwatchConfig {
    /// Monitor settings
    pub monitor: MonitorConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl HealthwatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: p.to_path_buf(),
                    source,
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(Some(path))
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports HEALTHWATCH_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("HEALTHWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HEALTHWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(max_events) = std::env::var("HEALTHWATCH_MAX_EVENTS") {
            if let Ok(n) = max_events.parse() {
                self.monitor.max_events = n;
            }
        }
        if let Ok(interval) = std::env::var("HEALTHWATCH_POLL_INTERVAL") {
            if let Ok(n) = interval.parse() {
                self.monitor.poll_interval_seconds = n;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.max_events == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.max_events".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.monitor.report_recent_events == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.report_recent_events".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.monitor.poll_interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.poll_interval_seconds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        logging::validate_level(&self.logging.level)?;

        Ok(())
    }
}
