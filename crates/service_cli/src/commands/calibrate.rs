//! Calibrate command: regulatory disclosures → calibration snapshot.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use adapter_regulatory::efficiency::REPORT_FALLBACK_EFFICIENCY;
use adapter_regulatory::equity::EQUITY_BASE_FAIL_RATE;
use adapter_regulatory::{BondVolumeIngester, EfficiencySource, EquityFtdIngester, Regime};
use forge_calibration::{save_snapshot, SnapshotBuilder};

use crate::config::RunConfig;
use crate::Result;

/// Runs the full calibration pipeline and persists the snapshot.
pub fn run(config: &RunConfig) -> Result<()> {
    let section = &config.calibration;
    info!("Starting calibration");
    info!("  Equity FTD directory: {}", section.equity_dir.display());
    info!("  Bond volume report:   {}", section.bond_file.display());

    // Equity branch: per-symbol normalised scores → instrument priors.
    let equity = EquityFtdIngester.ingest_dir(&section.equity_dir);
    if equity.is_empty() {
        warn!("Equity branch produced no instruments");
    } else {
        info!("Equity universe: {} symbols", equity.len());
    }
    let equity_instruments = equity.into_instruments(EQUITY_BASE_FAIL_RATE);

    // Bond branch: market context + expanded synthetic universe. The
    // expansion draws ids and priors, so it shares the run seed when one
    // is pinned.
    let mut rng = match config.synthesis.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let bond = BondVolumeIngester::new(section.step_policy, section.expansion_count)
        .ingest_or_default(&section.bond_file, &mut rng);
    info!(
        "Bond universe: {} sub-instruments, ADV {:.0}M, multiplier {:.1}x",
        bond.instruments.len(),
        bond.context.avg_daily_volume_m,
        bond.context.liquidity_multiplier
    );

    // Efficiency branch: regime table, or report scan when paths given.
    let source = if section.report_paths.is_empty() {
        EfficiencySource::Regime(Regime::parse_lenient(&section.regime))
    } else {
        EfficiencySource::ReportScan {
            paths: section.report_paths.clone(),
            fallback: REPORT_FALLBACK_EFFICIENCY,
        }
    };
    let efficiency = source.resolve();

    let mut builder = SnapshotBuilder::new()
        .efficiency(efficiency)?
        .market_context(bond.context)
        .add_instruments(equity_instruments)?
        .add_instruments(bond.instruments)?;
    if let Some(year) = &section.source_year {
        builder = builder.source_year(year.clone());
    }
    let snapshot = builder.build();

    save_snapshot(&config.snapshot_path, &snapshot)?;
    info!(
        "Snapshot saved: {} ({} instruments, {:.2}% efficiency)",
        config.snapshot_path.display(),
        snapshot.len(),
        snapshot.systemic_efficiency() * 100.0
    );
    Ok(())
}
