//! CLI error types.

use thiserror::Error;

/// Convenience alias used across the command modules.
pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level error for the `settleforge` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Run configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Calibration store failure (including the fatal missing snapshot).
    #[error(transparent)]
    Calibration(#[from] forge_calibration::CalibrationError),

    /// Synthesis failure.
    #[error(transparent)]
    Engine(#[from] forge_engine::EngineError),

    /// Output sink failure.
    #[error(transparent)]
    Sink(#[from] forge_sink::SinkError),

    /// Filesystem failure.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl From<forge_engine::ConfigError> for CliError {
    fn from(e: forge_engine::ConfigError) -> Self {
        CliError::Engine(e.into())
    }
}
