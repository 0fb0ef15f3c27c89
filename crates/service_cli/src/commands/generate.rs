//! Generate command: snapshot + market context → instruction batch.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use forge_calibration::load_snapshot;
use forge_engine::{SynthesisConfig, Synthesizer};
use forge_market::{resolve_stress, HttpIndexSource, StressContext, FALLBACK_INDEX_VALUE};
use forge_sink::{CsvSink, InstructionSink, JsonSink};

use crate::config::{OutputFormat, RunConfig};
use crate::Result;

/// Runs one synthesis batch and writes it to the configured sink.
pub fn run(config: &RunConfig) -> Result<()> {
    // The missing snapshot is the one fatal condition in the pipeline.
    let snapshot = Arc::new(load_snapshot(&config.snapshot_path)?);
    info!(
        "Snapshot loaded: {} instruments, calibrated {}",
        snapshot.len(),
        snapshot.metadata().calibration_date
    );

    // One volatility fetch per run; offline runs pin the fallback level.
    let stress = if config.synthesis.offline {
        info!("Offline run: pinning index at fallback {FALLBACK_INDEX_VALUE}");
        StressContext::from_index_value(FALLBACK_INDEX_VALUE)
    } else {
        resolve_stress(&HttpIndexSource::new(&config.synthesis.index_symbol))
    };

    let mut builder = SynthesisConfig::builder()
        .trades_per_day(config.synthesis.trades_per_day)
        .business_days(config.synthesis.business_days)
        .equity_mix(config.synthesis.equity_mix)
        .currency(config.synthesis.currency);
    if let Some(seed) = config.synthesis.seed {
        builder = builder.seed(seed);
    }
    let synthesis = builder.build()?;

    let synthesizer = Synthesizer::new(synthesis, snapshot, stress)?;
    info!(seed = synthesizer.seed(), "Generating batch");
    let batch = synthesizer.generate_parallel(Utc::now().date_naive());

    let fails = batch.iter().filter(|r| r.status.is_fail()).count();
    info!(
        "Batch complete: {} instructions, {} pending fails ({:.2}%)",
        batch.len(),
        fails,
        100.0 * fails as f64 / batch.len() as f64
    );

    match config.output.format {
        OutputFormat::Json => {
            let mut sink = JsonSink::create(&config.output.path)?;
            if config.output.masked {
                sink = sink.masked();
            }
            sink.write_batch(&batch)?;
        }
        OutputFormat::Csv => {
            CsvSink::create(&config.output.path)?.write_batch(&batch)?;
        }
    }
    info!("Batch written to {}", config.output.path.display());
    Ok(())
}
