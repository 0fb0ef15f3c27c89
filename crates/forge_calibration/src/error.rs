//! Error types for the calibration store.

use std::path::PathBuf;

use thiserror::Error;

/// Calibration store and persistence errors.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Equity and bond universes produced the same ticker key.
    #[error("Duplicate ticker in snapshot: {0}")]
    DuplicateTicker(String),

    /// Efficiency must be a fraction in (0, 1].
    #[error("Systemic efficiency {0} outside (0, 1]")]
    InvalidEfficiency(f64),

    /// The snapshot artifact is not where synthesis expects it.
    ///
    /// This is the single fatal condition of the pipeline: without priors
    /// the synthesiser cannot price risk and must abort rather than emit
    /// unpriced trades.
    #[error("Calibration snapshot not found at {0}; run `settleforge calibrate` first")]
    SnapshotMissing(PathBuf),

    /// Snapshot exists but holds no instruments.
    #[error("Calibration snapshot at {0} contains no instruments")]
    EmptySnapshot(PathBuf),

    /// IO failure reading or writing the artifact.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed snapshot JSON.
    #[error("Snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_missing_mentions_remedy() {
        let err = CalibrationError::SnapshotMissing(PathBuf::from("seed_engine.json"));
        assert!(err.to_string().contains("settleforge calibrate"));
    }
}
