//! healthwatch - dependency health monitoring for serverless backends
//!
//! This library classifies failures from downstream services, tracks a current
//! status per dependency, and keeps a bounded log of outage, recovery and error
//! events.

pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod monitor;
