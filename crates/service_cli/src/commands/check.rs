//! Check command: validate configuration and data paths without running.

use tracing::{info, warn};

use adapter_regulatory::Regime;
use forge_calibration::load_snapshot;

use crate::config::RunConfig;
use crate::Result;

/// Validates the run configuration and reports on every input path.
///
/// Missing data files are warnings, not errors: calibration degrades to
/// documented defaults. Only an invalid configuration fails the check.
pub fn run(config: &RunConfig) -> Result<()> {
    config.validate()?;
    info!("Configuration valid");

    let regime = Regime::parse_lenient(&config.calibration.regime);
    info!(
        "Regime {:?}: efficiency {:.4}",
        regime,
        regime.efficiency()
    );

    if config.calibration.equity_dir.is_dir() {
        info!(
            "Equity FTD directory present: {}",
            config.calibration.equity_dir.display()
        );
    } else {
        warn!(
            "Equity FTD directory missing: {} (equity branch will be empty)",
            config.calibration.equity_dir.display()
        );
    }

    if config.calibration.bond_file.is_file() {
        info!(
            "Bond volume report present: {}",
            config.calibration.bond_file.display()
        );
    } else {
        warn!(
            "Bond volume report missing: {} (bond branch will use defaults)",
            config.calibration.bond_file.display()
        );
    }

    for path in &config.calibration.report_paths {
        if !path.is_file() {
            warn!("Report file missing: {}", path.display());
        }
    }

    match load_snapshot(&config.snapshot_path) {
        Ok(snapshot) => info!(
            "Snapshot present: {} instruments, calibrated {}",
            snapshot.len(),
            snapshot.metadata().calibration_date
        ),
        Err(e) => warn!("No usable snapshot yet: {}", e),
    }

    info!("Check complete");
    Ok(())
}
