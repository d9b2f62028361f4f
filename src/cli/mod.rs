//! CLI module for healthwatch
//!
//! Command-line front end that wires a [`HealthMonitor`](crate::monitor::HealthMonitor)
//! to recorded call traces.
//!
//! # Commands
//!
//! - `replay` - Feed a trace of dependency calls through the monitor and print the result
//! - `watch` - Replay a trace over time while polling for outages
//! - `classify` - Show how an error code and message are classified
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Replay a captured trace and print the maintenance report
//! healthwatch replay calls.jsonl
//!
//! # Export the resulting state as JSON
//! healthwatch replay calls.jsonl --format json
//!
//! # Check a single error
//! healthwatch classify --code ThrottlingException --message "Rate exceeded"
//! ```

pub mod classify;
pub mod completions;
pub mod config;
pub mod output;
pub mod replay;
pub mod trace;
pub mod watch;

pub use classify::handle_classify;
pub use completions::handle_completions;
pub use config::handle_config_init;
pub use replay::handle_replay;
pub use watch::handle_watch;

use crate::config::HealthwatchConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// healthwatch - service health monitor diagnostics
#[derive(Parser, Debug)]
#[command(
    name = "healthwatch",
    version,
    about = "Classify backend failures and track per-dependency health"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a trace of dependency calls and print the resulting health
    Replay(ReplayArgs),
    /// Replay a trace over time, printing a banner whenever outages change
    Watch(WatchArgs),
    /// Classify an error code and message
    Classify(ClassifyArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Settings shared by commands that build a monitor.
#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "healthwatch.toml")]
    pub config: PathBuf,

    /// Override the event log bound
    #[arg(long, env = "HEALTHWATCH_MAX_EVENTS")]
    pub max_events: Option<usize>,

    /// Set log level (trace, debug, info, warn, error, off)
    #[arg(short, long, env = "HEALTHWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Output format for `replay`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReplayFormat {
    /// Plain-text maintenance report
    Report,
    /// Status and event tables
    Table,
    /// JSON export of statuses and events
    Json,
    /// Prometheus text exposition of the monitor's metrics
    Prometheus,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines trace file
    pub trace: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReplayFormat::Report)]
    pub format: ReplayFormat,

    /// Number of recent events to show in table output
    #[arg(short, long)]
    pub events: Option<usize>,

    #[command(flatten)]
    pub monitor: MonitorArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// JSON-lines trace file
    pub trace: PathBuf,

    /// Delay between replayed calls, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Poll interval in milliseconds (defaults to the configured poll interval)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    #[command(flatten)]
    pub monitor: MonitorArgs,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Error code reported by the service
    #[arg(long, default_value = "")]
    pub code: String,

    /// Error message
    #[arg(short, long, default_value = "")]
    pub message: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "healthwatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Load configuration with environment and CLI overrides, then validate it.
pub fn load_config(args: &MonitorArgs) -> Result<HealthwatchConfig, Box<dyn std::error::Error>> {
    let mut config = HealthwatchConfig::load_or_default(&args.config)?.with_env_overrides();

    if let Some(max_events) = args.max_events {
        config.monitor.max_events = max_events;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}
