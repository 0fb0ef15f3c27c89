//! Error types for regulatory ingestion.
//!
//! Every variant here is recoverable by design: callers log the failure
//! and continue with the remaining files or the documented defaults.

use std::path::PathBuf;

use thiserror::Error;

/// Ingestion error for a single regulatory source.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source directory or file does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    /// No parsable files were found under the source directory.
    #[error("No usable report files under {0}")]
    NoUsableFiles(PathBuf),

    /// Required columns missing after header trimming.
    #[error("{path}: missing required column '{column}'")]
    MissingColumn {
        /// Offending file.
        path: PathBuf,
        /// Column that was not found.
        column: &'static str,
    },

    /// Required product row missing from the volume table.
    #[error("Product '{0}' not found in the volume report")]
    MissingProduct(String),

    /// Configured expansion count exceeds the per-product id space.
    #[error("Expansion count {requested} exceeds the id space of {max}")]
    ExpansionTooLarge {
        /// Requested sub-instruments per product.
        requested: usize,
        /// Largest admissible expansion count.
        max: usize,
    },

    /// Underlying CSV decode failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Domain validation failure when building instrument records.
    #[error("Record validation: {0}")]
    Core(#[from] forge_core::CoreError),
}
