//! Error types for the output sinks.

use thiserror::Error;

/// Failures while persisting a batch.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Filesystem failure.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation failure.
    #[error("JSON serialisation failed: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialisation failure.
    #[error("CSV serialisation failed: {0}")]
    Csv(#[from] csv::Error),
}
