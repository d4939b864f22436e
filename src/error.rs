//! Error types for quickscan.
//!
//! Uses `thiserror` for ergonomic error definitions. Only configuration-time
//! problems are errors; a port that fails to connect is a normal "not open"
//! result and never surfaces here.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for setting up and running a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid port specification: {0}")]
    InvalidPortSpec(#[from] PortError),

    #[error("contradicting options: {0} and {1} cannot be combined")]
    PolicyConflict(&'static str, &'static str),

    #[error("target resolution failed: {0}")]
    Resolution(#[from] TargetError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading persisted settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
