//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid materiality threshold.
    #[error("Invalid threshold: {0}. Must be between 0 and 1.")]
    InvalidThreshold(f64),

    /// Invalid notional.
    #[error("Invalid notional: {0}. Must be a positive amount.")]
    InvalidNotional(f64),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error in {path}: {reason}")]
    Config {
        /// Offending file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
