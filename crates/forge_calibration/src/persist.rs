//! Snapshot persistence.
//!
//! The snapshot artifact is pretty-printed JSON with the schema asserted
//! in [`crate::snapshot`] tests. Loading a missing artifact is the one
//! fatal error of the pipeline.

use std::path::Path;

use tracing::info;

use crate::error::CalibrationError;
use crate::snapshot::CalibrationSnapshot;

/// Writes the snapshot artifact to `path`.
pub fn save_snapshot(path: &Path, snapshot: &CalibrationSnapshot) -> Result<(), CalibrationError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)?;
    info!(
        "Snapshot saved: {} ({} tickers)",
        path.display(),
        snapshot.len()
    );
    Ok(())
}

/// Loads the snapshot artifact from `path`.
///
/// # Errors
///
/// - [`CalibrationError::SnapshotMissing`] if the artifact does not exist;
///   synthesis must abort rather than run without priors.
/// - [`CalibrationError::EmptySnapshot`] if it holds no instruments.
/// - [`CalibrationError::Json`] if it does not decode.
pub fn load_snapshot(path: &Path) -> Result<CalibrationSnapshot, CalibrationError> {
    if !path.is_file() {
        return Err(CalibrationError::SnapshotMissing(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    let snapshot: CalibrationSnapshot = serde_json::from_str(&text)?;
    if snapshot.is_empty() {
        return Err(CalibrationError::EmptySnapshot(path.to_path_buf()));
    }
    info!(
        "Snapshot loaded: {} tickers, calibrated {}",
        snapshot.len(),
        snapshot.metadata().calibration_date
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SnapshotBuilder;
    use forge_core::types::{AssetClass, LiquidityProfile};
    use forge_core::InstrumentRecord;
    use tempfile::TempDir;

    fn sample() -> CalibrationSnapshot {
        let record = InstrumentRecord::new(
            "AAPL",
            AssetClass::Equity,
            0.02,
            LiquidityProfile::High,
            "sec_ftd",
        )
        .unwrap();
        SnapshotBuilder::new()
            .add_instruments(vec![record])
            .unwrap()
            .build()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed_engine.json");
        let snapshot = sample();

        save_snapshot(&path, &snapshot).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_missing_snapshot_is_fatal() {
        let result = load_snapshot(Path::new("/nonexistent/seed_engine.json"));
        assert!(matches!(result, Err(CalibrationError::SnapshotMissing(_))));
    }

    #[test]
    fn test_empty_snapshot_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed_engine.json");
        save_snapshot(&path, &SnapshotBuilder::new().build()).unwrap();
        let result = load_snapshot(&path);
        assert!(matches!(result, Err(CalibrationError::EmptySnapshot(_))));
    }

    #[test]
    fn test_garbage_snapshot_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed_engine.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = load_snapshot(&path);
        assert!(matches!(result, Err(CalibrationError::Json(_))));
    }
}
