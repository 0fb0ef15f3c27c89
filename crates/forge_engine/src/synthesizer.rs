//! The batch trade synthesiser.
//!
//! Draws every attribute of every instruction from a seeded RNG, assembles
//! the composite failure probability per trade, and emits batches totally
//! ordered by preparation timestamp.
//!
//! Each business day is an independent shard seeded with `seed + day`, so
//! sequential and rayon-parallel generation produce byte-identical batches
//! for the same seed.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use forge_calibration::{CalibrationSnapshot, TickerMeta};
use forge_core::counterparty::reference_desk;
use forge_core::instruction::next_business_day;
use forge_core::{
    AssetClass, Counterparty, Direction, ReasonCode, SettlementInstruction, TimeOfDayFlag,
};
use forge_market::StressContext;

use crate::config::{nth_business_day, SynthesisConfig, TRADING_DAY_START_HOUR};
use crate::error::{ConfigError, EngineError};
use crate::factors::{decide_status, jittered_stress, liquidity_factor, RiskFactors};
use crate::rng::ForgeRng;

/// One calibrated instrument drawn into a trade.
#[derive(Clone, Debug)]
struct UniverseEntry {
    ticker: String,
    meta: TickerMeta,
}

/// Seeded batch synthesiser over one calibration snapshot.
///
/// Construction validates the universe and pre-builds every distribution;
/// generation is then infallible and deterministic for the resolved seed.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use forge_calibration::load_snapshot;
/// use forge_engine::config::SynthesisConfig;
/// use forge_engine::synthesizer::Synthesizer;
/// use forge_market::StressContext;
///
/// let snapshot = Arc::new(load_snapshot("seed_data.json".as_ref())?);
/// let config = SynthesisConfig::builder().seed(42).build()?;
/// let synthesizer = Synthesizer::new(config, snapshot, StressContext::neutral())?;
/// let batch = synthesizer.generate_parallel(chrono::Utc::now().date_naive());
/// assert!(!batch.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Synthesizer {
    config: SynthesisConfig,
    snapshot: Arc<CalibrationSnapshot>,
    stress: StressContext,
    desk: Vec<Counterparty>,
    equity_universe: Vec<UniverseEntry>,
    fi_universe: Vec<UniverseEntry>,
    counterparty_picker: WeightedIndex<u32>,
    hour_picker: WeightedIndex<u32>,
    equity_amounts: LogNormal<f64>,
    fi_amounts: LogNormal<f64>,
    effective_equity_mix: f64,
    seed: u64,
}

impl Synthesizer {
    /// Creates a synthesiser over the default counterparty desk.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyUniverse`] if the snapshot holds no
    /// instruments, or a weight/desk mismatch error.
    pub fn new(
        config: SynthesisConfig,
        snapshot: Arc<CalibrationSnapshot>,
        stress: StressContext,
    ) -> Result<Self, EngineError> {
        Self::with_desk(config, snapshot, stress, reference_desk())
    }

    /// Creates a synthesiser over an explicit counterparty desk.
    ///
    /// The configured counterparty weights are positional against `desk`.
    pub fn with_desk(
        config: SynthesisConfig,
        snapshot: Arc<CalibrationSnapshot>,
        stress: StressContext,
        desk: Vec<Counterparty>,
    ) -> Result<Self, EngineError> {
        if desk.is_empty() {
            return Err(EngineError::EmptyDesk);
        }
        if config.counterparty_weights().len() != desk.len() {
            return Err(EngineError::WeightCountMismatch {
                weights: config.counterparty_weights().len(),
                desk: desk.len(),
            });
        }

        let (equity_universe, fi_universe) = partition_universe(&snapshot);
        if equity_universe.is_empty() && fi_universe.is_empty() {
            return Err(EngineError::EmptyUniverse);
        }
        let effective_equity_mix = if fi_universe.is_empty() {
            warn!("Fixed-income universe empty; generating equity-only flow");
            1.0
        } else if equity_universe.is_empty() {
            warn!("Equity universe empty; generating fixed-income-only flow");
            0.0
        } else {
            config.equity_mix()
        };

        let counterparty_picker = WeightedIndex::new(config.counterparty_weights().iter())
            .map_err(|_| ConfigError::DegenerateWeights("counterparty"))?;
        let hour_picker = WeightedIndex::new(config.hour_weights().iter())
            .map_err(|_| ConfigError::DegenerateWeights("hour"))?;
        let equity_amounts = LogNormal::new(config.equity_amount_mu(), config.amount_sigma())
            .map_err(|_| ConfigError::InvalidAmountSigma(config.amount_sigma()))?;
        let fi_amounts = LogNormal::new(config.fi_amount_mu(), config.amount_sigma())
            .map_err(|_| ConfigError::InvalidAmountSigma(config.amount_sigma()))?;

        let seed = config.seed().unwrap_or_else(rand::random);
        info!(
            seed,
            universe = snapshot.len(),
            batch = config.batch_size(),
            "Synthesiser ready"
        );

        Ok(Self {
            config,
            snapshot,
            stress,
            desk,
            equity_universe,
            fi_universe,
            counterparty_picker,
            hour_picker,
            equity_amounts,
            fi_amounts,
            effective_equity_mix,
            seed,
        })
    }

    /// The seed this synthesiser actually runs with (configured or drawn).
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates the full batch sequentially.
    ///
    /// Output is sorted non-decreasing by preparation timestamp and is
    /// identical to [`Self::generate_parallel`] for the same seed.
    pub fn generate(&self, today: NaiveDate) -> Vec<SettlementInstruction> {
        let start = self.config.resolved_start(today);
        let mut batch: Vec<SettlementInstruction> = (0..self.config.business_days())
            .flat_map(|day| self.generate_day(start, day))
            .collect();
        batch.sort_by_key(|r| r.preparation_datetime);
        batch
    }

    /// Generates the full batch with one rayon task per business day.
    pub fn generate_parallel(&self, today: NaiveDate) -> Vec<SettlementInstruction> {
        let start = self.config.resolved_start(today);
        let mut batch: Vec<SettlementInstruction> = (0..self.config.business_days())
            .into_par_iter()
            .flat_map_iter(|day| self.generate_day(start, day))
            .collect();
        batch.sort_by_key(|r| r.preparation_datetime);
        batch
    }

    /// Generates one business-day shard with its own derived seed.
    fn generate_day(&self, start: NaiveDate, day: usize) -> Vec<SettlementInstruction> {
        let date = nth_business_day(start, day);
        let mut rng = ForgeRng::from_seed(self.seed.wrapping_add(day as u64));
        let shard: Vec<SettlementInstruction> = (0..self.config.trades_per_day())
            .map(|_| self.synthesize_trade(date, &mut rng))
            .collect();
        debug!(day, %date, trades = shard.len(), "Day shard complete");
        shard
    }

    /// Synthesises one instruction for the given preparation date.
    fn synthesize_trade(&self, date: NaiveDate, rng: &mut ForgeRng) -> SettlementInstruction {
        // 1. Asset class, then instrument, uniform within its universe.
        let is_equity = rng.gen_uniform() < self.effective_equity_mix;
        let universe = if is_equity {
            &self.equity_universe
        } else {
            &self.fi_universe
        };
        let entry = &universe[rng.gen_range(0..universe.len())];

        // 2. Counterparty by desk flow weight.
        let counterparty = &self.desk[self.counterparty_picker.sample(rng)];

        // 3. Preparation timestamp inside the trading window.
        let hour = TRADING_DAY_START_HOUR + self.hour_picker.sample(rng) as u32;
        let minute = rng.gen_range(0..60);
        let second = rng.gen_range(0..60);
        let preparation_datetime = date
            .and_hms_opt(hour, minute, second)
            .expect("hour drawn from the trading window")
            .and_utc();
        let time_of_day_flag = TimeOfDayFlag::from_hour(hour);

        // 4. Liquidity score, uniform within the class band.
        let (lo, hi) = if is_equity {
            self.config.equity_liquidity_range()
        } else {
            self.config.fi_liquidity_range()
        };
        let liquidity_score = round2(rng.gen_range(lo..hi));

        // 5. Log-normal amount; fixed income is capped at 0.5% of ADV.
        let raw_amount = if is_equity {
            self.equity_amounts.sample(rng)
        } else {
            self.fi_amounts
                .sample(rng)
                .min(self.snapshot.bond_market_context().max_fi_trade_amount())
        };
        let settlement_amount = round2(raw_amount);

        // 6. Per-trade stress jitter around the run-level multiplier.
        let stress_factor = jittered_stress(
            self.stress.multiplier,
            self.config.stress_jitter_sigma(),
            self.config.stress_floor(),
            rng,
        );

        // 7. Composite failure probability.
        let size_threshold = if is_equity {
            self.config.equity_size_threshold()
        } else {
            self.config.fi_size_threshold()
        };
        let factors = RiskFactors {
            base_risk: entry.meta.historical_fail_rate,
            stress_factor,
            counterparty_factor: counterparty.credit_factor(),
            liquidity_factor: liquidity_factor(liquidity_score),
            time_factor: if time_of_day_flag.is_near_cutoff() {
                self.config.cutoff_time_factor()
            } else {
                1.0
            },
            size_factor: if settlement_amount > size_threshold {
                self.config.size_risk_factor()
            } else {
                1.0
            },
            systemic_baseline: self.snapshot.fail_baseline(),
        };
        let probability = factors.composite_probability(self.config.probability_cap());

        // 8. Outcome, direction, and reason code.
        let status = decide_status(probability, rng.gen_uniform());
        let direction = if rng.gen_uniform() < 0.5 {
            Direction::Deliver
        } else {
            Direction::Receive
        };
        let reason_code = status.is_fail().then(|| {
            ReasonCode::infer(direction, liquidity_score, counterparty.credit_score())
        });

        // 9. Assemble the immutable record.
        SettlementInstruction {
            uetr: uuid::Builder::from_random_bytes(rng.gen()).into_uuid(),
            preparation_datetime,
            settlement_date: next_business_day(date),
            asset_class: entry.meta.asset_class,
            instrument_ref: entry.ticker.clone(),
            liquidity_score,
            direction,
            counterparty_ref: counterparty.name().to_string(),
            counterparty_credit_score: counterparty.credit_score(),
            counterparty_fail_rate: counterparty.historical_fail_rate(),
            settlement_amount,
            time_of_day_flag,
            currency: self.config.currency(),
            status,
            reason_code,
            market_volatility_factor: stress_factor,
        }
    }
}

/// Splits the snapshot universe into its equity and fixed-income halves.
fn partition_universe(
    snapshot: &CalibrationSnapshot,
) -> (Vec<UniverseEntry>, Vec<UniverseEntry>) {
    let mut equity = Vec::new();
    let mut fixed_income = Vec::new();
    for (ticker, meta) in snapshot.ticker_metadata() {
        let entry = UniverseEntry {
            ticker: ticker.clone(),
            meta: meta.clone(),
        };
        match meta.asset_class {
            AssetClass::Equity => equity.push(entry),
            AssetClass::CorporateBond | AssetClass::FixedIncome => fixed_income.push(entry),
        }
    }
    (equity, fixed_income)
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_calibration::SnapshotBuilder;
    use forge_core::types::LiquidityProfile;
    use forge_core::InstrumentRecord;

    fn test_snapshot() -> Arc<CalibrationSnapshot> {
        let equities = vec![
            InstrumentRecord::new("AAPL", AssetClass::Equity, 0.02, LiquidityProfile::High, "t")
                .unwrap(),
            InstrumentRecord::new("MSFT", AssetClass::Equity, 0.03, LiquidityProfile::High, "t")
                .unwrap(),
        ];
        let bonds = vec![InstrumentRecord::new(
            "CORP-000001",
            AssetClass::CorporateBond,
            0.05,
            LiquidityProfile::Medium,
            "t",
        )
        .unwrap()];
        Arc::new(
            SnapshotBuilder::new()
                .efficiency(0.9669)
                .unwrap()
                .add_instruments(equities)
                .unwrap()
                .add_instruments(bonds)
                .unwrap()
                .build(),
        )
    }

    fn test_config(seed: u64) -> SynthesisConfig {
        SynthesisConfig::builder()
            .trades_per_day(200)
            .business_days(2)
            .seed(seed)
            .start_date(NaiveDate::from_ymd_opt(2025, 11, 24).unwrap())
            .build()
            .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 26).unwrap()
    }

    #[test]
    fn test_batch_size_and_ordering() {
        let synthesizer =
            Synthesizer::new(test_config(42), test_snapshot(), StressContext::neutral()).unwrap();
        let batch = synthesizer.generate(today());
        assert_eq!(batch.len(), 400);
        for pair in batch.windows(2) {
            assert!(pair[0].preparation_datetime <= pair[1].preparation_datetime);
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let synthesizer =
            Synthesizer::new(test_config(42), test_snapshot(), StressContext::neutral()).unwrap();
        assert_eq!(
            synthesizer.generate(today()),
            synthesizer.generate_parallel(today())
        );
    }

    #[test]
    fn test_same_seed_same_batch() {
        let a = Synthesizer::new(test_config(7), test_snapshot(), StressContext::neutral())
            .unwrap()
            .generate(today());
        let b = Synthesizer::new(test_config(7), test_snapshot(), StressContext::neutral())
            .unwrap()
            .generate(today());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_batch() {
        let a = Synthesizer::new(test_config(1), test_snapshot(), StressContext::neutral())
            .unwrap()
            .generate(today());
        let b = Synthesizer::new(test_config(2), test_snapshot(), StressContext::neutral())
            .unwrap()
            .generate(today());
        assert_ne!(a, b);
    }

    #[test]
    fn test_every_record_consistent() {
        let synthesizer =
            Synthesizer::new(test_config(42), test_snapshot(), StressContext::neutral()).unwrap();
        for record in synthesizer.generate(today()) {
            assert!(record.is_consistent());
            assert!((0.0..=1.0).contains(&record.liquidity_score));
            assert!(record.settlement_amount > 0.0);
            assert!(record.market_volatility_factor >= 0.5);
            assert!(record.settlement_date > record.preparation_datetime.date_naive());
        }
    }

    #[test]
    fn test_unique_uetrs() {
        let synthesizer =
            Synthesizer::new(test_config(42), test_snapshot(), StressContext::neutral()).unwrap();
        let batch = synthesizer.generate(today());
        let mut ids: Vec<_> = batch.iter().map(|r| r.uetr).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), batch.len());
    }

    #[test]
    fn test_class_mix_roughly_respected() {
        let synthesizer =
            Synthesizer::new(test_config(42), test_snapshot(), StressContext::neutral()).unwrap();
        let batch = synthesizer.generate(today());
        let equity = batch
            .iter()
            .filter(|r| r.asset_class == AssetClass::Equity)
            .count();
        let share = equity as f64 / batch.len() as f64;
        assert!((0.60..=0.80).contains(&share), "equity share {}", share);
    }

    #[test]
    fn test_preparation_dates_are_weekdays() {
        // Start Friday so the second shard has to roll over the weekend.
        let config = SynthesisConfig::builder()
            .trades_per_day(10)
            .business_days(2)
            .seed(42)
            .start_date(NaiveDate::from_ymd_opt(2025, 11, 28).unwrap())
            .build()
            .unwrap();
        let synthesizer =
            Synthesizer::new(config, test_snapshot(), StressContext::neutral()).unwrap();
        let dates: Vec<NaiveDate> = synthesizer
            .generate(today())
            .iter()
            .map(|r| r.preparation_datetime.date_naive())
            .collect();
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2025, 11, 28).unwrap()));
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()));
    }

    #[test]
    fn test_equity_only_snapshot_degrades() {
        let equity_only = Arc::new(
            SnapshotBuilder::new()
                .add_instruments(vec![InstrumentRecord::new(
                    "AAPL",
                    AssetClass::Equity,
                    0.02,
                    LiquidityProfile::High,
                    "t",
                )
                .unwrap()])
                .unwrap()
                .build(),
        );
        let synthesizer =
            Synthesizer::new(test_config(42), equity_only, StressContext::neutral()).unwrap();
        let batch = synthesizer.generate(today());
        assert!(batch.iter().all(|r| r.asset_class == AssetClass::Equity));
    }

    #[test]
    fn test_empty_snapshot_rejected() {
        let empty = Arc::new(SnapshotBuilder::new().build());
        let result = Synthesizer::new(test_config(42), empty, StressContext::neutral());
        assert!(matches!(result, Err(EngineError::EmptyUniverse)));
    }

    #[test]
    fn test_weight_mismatch_rejected() {
        let config = SynthesisConfig::builder()
            .counterparty_weights(vec![1, 1])
            .seed(42)
            .build()
            .unwrap();
        let result = Synthesizer::new(config, test_snapshot(), StressContext::neutral());
        assert!(matches!(
            result,
            Err(EngineError::WeightCountMismatch { weights: 2, desk: 5 })
        ));
    }

    #[test]
    fn test_fi_amounts_respect_adv_cap() {
        let cap_snapshot = test_snapshot();
        let cap = cap_snapshot.bond_market_context().max_fi_trade_amount();
        let config = SynthesisConfig::builder()
            .trades_per_day(500)
            .business_days(1)
            .equity_mix(0.0)
            .seed(42)
            .start_date(NaiveDate::from_ymd_opt(2025, 11, 24).unwrap())
            .build()
            .unwrap();
        let synthesizer =
            Synthesizer::new(config, cap_snapshot, StressContext::neutral()).unwrap();
        for record in synthesizer.generate(today()) {
            assert!(record.settlement_amount <= cap);
        }
    }
}
