//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating `healthwatch.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {0} does not exist (run `healthwatch config init` to create one)")]
    NotFound(PathBuf),

    #[error("config {path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config setting '{field}' {message}")]
    Validation { field: String, message: String },
}
