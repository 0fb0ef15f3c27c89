//! Synthesis configuration.
//!
//! All the canonical constants of the failure model live here as
//! configurable defaults. An unmodified [`SynthesisConfig::default`]
//! reproduces the reference schedule: five business days of 2,000 trades
//! with a 70/30 equity/fixed-income mix.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use forge_core::Currency;

use crate::error::ConfigError;

/// Maximum number of trades per business day.
pub const MAX_TRADES_PER_DAY: usize = 1_000_000;

/// Maximum number of business days per batch (roughly one trading year).
pub const MAX_BUSINESS_DAYS: usize = 260;

/// Default trades per business day.
pub const DEFAULT_TRADES_PER_DAY: usize = 2_000;

/// Default number of business days in a batch.
pub const DEFAULT_BUSINESS_DAYS: usize = 5;

/// Default equity share of the class mix.
pub const DEFAULT_EQUITY_MIX: f64 = 0.70;

/// Default desk flow weights, aligned with
/// [`forge_core::counterparty::reference_desk`] order.
pub const DEFAULT_COUNTERPARTY_WEIGHTS: [u32; 5] = [30, 30, 20, 15, 5];

/// First preparation hour of the trading day (24h clock).
pub const TRADING_DAY_START_HOUR: u32 = 8;

/// Default preparation-hour weights covering 08:00 through 16:59.
///
/// Flow concentrates towards the close; the last slot (16:00) carries six
/// times the weight of the opening hour.
pub const DEFAULT_HOUR_WEIGHTS: [u32; 9] = [5, 5, 5, 5, 10, 10, 10, 20, 30];

/// Immutable synthesis configuration.
///
/// Use [`SynthesisConfigBuilder`] to construct instances with non-default
/// parameters.
///
/// # Examples
///
/// ```rust
/// use forge_engine::config::SynthesisConfig;
///
/// let config = SynthesisConfig::builder()
///     .trades_per_day(10_000)
///     .business_days(1)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.batch_size(), 10_000);
/// ```
#[derive(Clone, Debug)]
pub struct SynthesisConfig {
    trades_per_day: usize,
    business_days: usize,
    seed: Option<u64>,
    equity_mix: f64,
    counterparty_weights: Vec<u32>,
    hour_weights: Vec<u32>,
    cutoff_time_factor: f64,
    equity_size_threshold: f64,
    fi_size_threshold: f64,
    size_risk_factor: f64,
    equity_amount_mu: f64,
    fi_amount_mu: f64,
    amount_sigma: f64,
    equity_liquidity_range: (f64, f64),
    fi_liquidity_range: (f64, f64),
    stress_jitter_sigma: f64,
    stress_floor: f64,
    probability_cap: f64,
    start_date: Option<NaiveDate>,
    currency: Currency,
}

impl SynthesisConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SynthesisConfigBuilder {
        SynthesisConfigBuilder::default()
    }

    /// Trades synthesised per business day.
    #[inline]
    pub fn trades_per_day(&self) -> usize {
        self.trades_per_day
    }

    /// Business days covered by one batch.
    #[inline]
    pub fn business_days(&self) -> usize {
        self.business_days
    }

    /// Total instructions in one batch.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.trades_per_day * self.business_days
    }

    /// Optional reproducibility seed. `None` means draw one at run time.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Probability that a trade draws from the equity universe.
    #[inline]
    pub fn equity_mix(&self) -> f64 {
        self.equity_mix
    }

    /// Desk flow weights, positional against the counterparty list.
    #[inline]
    pub fn counterparty_weights(&self) -> &[u32] {
        &self.counterparty_weights
    }

    /// Preparation-hour weights starting at [`TRADING_DAY_START_HOUR`].
    #[inline]
    pub fn hour_weights(&self) -> &[u32] {
        &self.hour_weights
    }

    /// Multiplier applied when preparation falls at or after the cutoff.
    #[inline]
    pub fn cutoff_time_factor(&self) -> f64 {
        self.cutoff_time_factor
    }

    /// Equity amount above which the size factor engages.
    #[inline]
    pub fn equity_size_threshold(&self) -> f64 {
        self.equity_size_threshold
    }

    /// Fixed-income amount above which the size factor engages.
    #[inline]
    pub fn fi_size_threshold(&self) -> f64 {
        self.fi_size_threshold
    }

    /// Size multiplier for block trades.
    #[inline]
    pub fn size_risk_factor(&self) -> f64 {
        self.size_risk_factor
    }

    /// Log-normal location parameter for equity amounts.
    #[inline]
    pub fn equity_amount_mu(&self) -> f64 {
        self.equity_amount_mu
    }

    /// Log-normal location parameter for fixed-income amounts.
    #[inline]
    pub fn fi_amount_mu(&self) -> f64 {
        self.fi_amount_mu
    }

    /// Log-normal dispersion shared by both amount distributions.
    #[inline]
    pub fn amount_sigma(&self) -> f64 {
        self.amount_sigma
    }

    /// Uniform draw range of equity liquidity scores.
    #[inline]
    pub fn equity_liquidity_range(&self) -> (f64, f64) {
        self.equity_liquidity_range
    }

    /// Uniform draw range of fixed-income liquidity scores.
    #[inline]
    pub fn fi_liquidity_range(&self) -> (f64, f64) {
        self.fi_liquidity_range
    }

    /// Standard deviation of the per-trade stress jitter.
    #[inline]
    pub fn stress_jitter_sigma(&self) -> f64 {
        self.stress_jitter_sigma
    }

    /// Floor applied to the jittered stress factor.
    #[inline]
    pub fn stress_floor(&self) -> f64 {
        self.stress_floor
    }

    /// Hard cap on the composite failure probability.
    #[inline]
    pub fn probability_cap(&self) -> f64 {
        self.probability_cap
    }

    /// Explicit batch start date, if pinned.
    #[inline]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Settlement currency stamped on every instruction.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Resolves the batch start date against `today`.
    ///
    /// Unpinned batches anchor to the Monday of the current week, matching
    /// the reference schedule. A pinned date falling on a weekend rolls
    /// forward to the next Monday.
    pub fn resolved_start(&self, today: NaiveDate) -> NaiveDate {
        let start = self.start_date.unwrap_or_else(|| batch_anchor(today));
        roll_to_weekday(start)
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfigBuilder::default()
            .build()
            .expect("default synthesis configuration is valid")
    }
}

/// Monday of the week containing `today`.
pub fn batch_anchor(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.weekday().num_days_from_monday()))
}

/// Rolls a weekend date forward to the next Monday.
fn roll_to_weekday(date: NaiveDate) -> NaiveDate {
    let mut date = date;
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date = date + Days::new(1);
    }
    date
}

/// The `offset`-th business day on or after `start` (offset 0 is `start`
/// itself, rolled off any weekend).
pub fn nth_business_day(start: NaiveDate, offset: usize) -> NaiveDate {
    let mut date = roll_to_weekday(start);
    for _ in 0..offset {
        date = roll_to_weekday(date + Days::new(1));
    }
    date
}

/// Builder for [`SynthesisConfig`].
///
/// Every parameter has a default; `build` validates the combination.
#[derive(Clone, Debug)]
pub struct SynthesisConfigBuilder {
    config: SynthesisConfig,
}

impl Default for SynthesisConfigBuilder {
    fn default() -> Self {
        Self {
            config: SynthesisConfig {
                trades_per_day: DEFAULT_TRADES_PER_DAY,
                business_days: DEFAULT_BUSINESS_DAYS,
                seed: None,
                equity_mix: DEFAULT_EQUITY_MIX,
                counterparty_weights: DEFAULT_COUNTERPARTY_WEIGHTS.to_vec(),
                hour_weights: DEFAULT_HOUR_WEIGHTS.to_vec(),
                cutoff_time_factor: 1.5,
                equity_size_threshold: 5_000_000.0,
                fi_size_threshold: 2_000_000.0,
                size_risk_factor: 2.0,
                equity_amount_mu: 10.2,
                fi_amount_mu: 11.5,
                amount_sigma: 1.2,
                equity_liquidity_range: (0.80, 0.99),
                fi_liquidity_range: (0.30, 0.70),
                stress_jitter_sigma: 0.05,
                stress_floor: 0.5,
                probability_cap: 0.98,
                start_date: None,
                currency: Currency::USD,
            },
        }
    }
}

impl SynthesisConfigBuilder {
    /// Sets the trades per business day.
    pub fn trades_per_day(mut self, trades: usize) -> Self {
        self.config.trades_per_day = trades;
        self
    }

    /// Sets the number of business days.
    pub fn business_days(mut self, days: usize) -> Self {
        self.config.business_days = days;
        self
    }

    /// Pins the reproducibility seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Sets the equity share of the class mix.
    pub fn equity_mix(mut self, mix: f64) -> Self {
        self.config.equity_mix = mix;
        self
    }

    /// Replaces the desk flow weights.
    pub fn counterparty_weights(mut self, weights: Vec<u32>) -> Self {
        self.config.counterparty_weights = weights;
        self
    }

    /// Pins the batch start date (weekends roll forward to Monday).
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.config.start_date = Some(date);
        self
    }

    /// Sets the settlement currency.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.config.currency = currency;
        self
    }

    /// Overrides the composite-probability hard cap.
    pub fn probability_cap(mut self, cap: f64) -> Self {
        self.config.probability_cap = cap;
        self
    }

    /// Replaces the preparation-hour weights (slot 0 is the start hour).
    pub fn hour_weights(mut self, weights: Vec<u32>) -> Self {
        self.config.hour_weights = weights;
        self
    }

    /// Overrides the near-cutoff time factor.
    pub fn cutoff_time_factor(mut self, factor: f64) -> Self {
        self.config.cutoff_time_factor = factor;
        self
    }

    /// Overrides the equity block-trade threshold.
    pub fn equity_size_threshold(mut self, threshold: f64) -> Self {
        self.config.equity_size_threshold = threshold;
        self
    }

    /// Overrides the fixed-income block-trade threshold.
    pub fn fi_size_threshold(mut self, threshold: f64) -> Self {
        self.config.fi_size_threshold = threshold;
        self
    }

    /// Overrides the block-trade size multiplier.
    pub fn size_risk_factor(mut self, factor: f64) -> Self {
        self.config.size_risk_factor = factor;
        self
    }

    /// Overrides the log-normal location parameters for amounts.
    pub fn amount_mu(mut self, equity_mu: f64, fi_mu: f64) -> Self {
        self.config.equity_amount_mu = equity_mu;
        self.config.fi_amount_mu = fi_mu;
        self
    }

    /// Overrides the log-normal dispersion shared by both amount draws.
    pub fn amount_sigma(mut self, sigma: f64) -> Self {
        self.config.amount_sigma = sigma;
        self
    }

    /// Overrides the equity liquidity draw range.
    pub fn equity_liquidity_range(mut self, lo: f64, hi: f64) -> Self {
        self.config.equity_liquidity_range = (lo, hi);
        self
    }

    /// Overrides the fixed-income liquidity draw range.
    pub fn fi_liquidity_range(mut self, lo: f64, hi: f64) -> Self {
        self.config.fi_liquidity_range = (lo, hi);
        self
    }

    /// Overrides the per-trade stress jitter (standard deviation, floor).
    pub fn stress_jitter(mut self, sigma: f64, floor: f64) -> Self {
        self.config.stress_jitter_sigma = sigma;
        self.config.stress_floor = floor;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for zero or oversized schedules, a class mix
    /// or probability cap outside its range, degenerate weights, or invalid
    /// draw parameters.
    pub fn build(self) -> Result<SynthesisConfig, ConfigError> {
        let config = self.config;
        if config.trades_per_day == 0 {
            return Err(ConfigError::ZeroTrades);
        }
        if config.trades_per_day > MAX_TRADES_PER_DAY {
            return Err(ConfigError::TooManyTrades {
                requested: config.trades_per_day,
                max: MAX_TRADES_PER_DAY,
            });
        }
        if config.business_days == 0 {
            return Err(ConfigError::ZeroDays);
        }
        if config.business_days > MAX_BUSINESS_DAYS {
            return Err(ConfigError::TooManyDays {
                requested: config.business_days,
                max: MAX_BUSINESS_DAYS,
            });
        }
        if !config.equity_mix.is_finite() || !(0.0..=1.0).contains(&config.equity_mix) {
            return Err(ConfigError::MixOutOfRange(config.equity_mix));
        }
        if config.counterparty_weights.is_empty()
            || config.counterparty_weights.iter().all(|&w| w == 0)
        {
            return Err(ConfigError::DegenerateWeights("counterparty"));
        }
        if config.hour_weights.is_empty() || config.hour_weights.iter().all(|&w| w == 0) {
            return Err(ConfigError::DegenerateWeights("hour"));
        }
        let max_slots = (24 - TRADING_DAY_START_HOUR) as usize;
        if config.hour_weights.len() > max_slots {
            return Err(ConfigError::OversizedHourWindow {
                slots: config.hour_weights.len(),
                max: max_slots,
            });
        }
        if !config.probability_cap.is_finite()
            || config.probability_cap <= 0.0
            || config.probability_cap > 1.0
        {
            return Err(ConfigError::CapOutOfRange(config.probability_cap));
        }
        if !config.amount_sigma.is_finite() || config.amount_sigma <= 0.0 {
            return Err(ConfigError::InvalidAmountSigma(config.amount_sigma));
        }
        for (lo, hi) in [config.equity_liquidity_range, config.fi_liquidity_range] {
            if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo >= hi {
                return Err(ConfigError::InvalidLiquidityRange { lo, hi });
            }
        }
        for (name, value) in [
            ("cutoff_time_factor", config.cutoff_time_factor),
            ("size_risk_factor", config.size_risk_factor),
            ("equity_size_threshold", config.equity_size_threshold),
            ("fi_size_threshold", config.fi_size_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidFactor { name, value });
            }
        }
        if !config.equity_amount_mu.is_finite() || !config.fi_amount_mu.is_finite() {
            return Err(ConfigError::InvalidFactor {
                name: "amount_mu",
                value: if config.equity_amount_mu.is_finite() {
                    config.fi_amount_mu
                } else {
                    config.equity_amount_mu
                },
            });
        }
        for (name, value) in [
            ("stress_jitter_sigma", config.stress_jitter_sigma),
            ("stress_floor", config.stress_floor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidFactor { name, value });
            }
        }
        Ok(config)
    }
}
