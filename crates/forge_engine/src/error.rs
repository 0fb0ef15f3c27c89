//! Error types for synthesis configuration and batch generation.

use thiserror::Error;

/// Validation errors from [`crate::config::SynthesisConfigBuilder`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `trades_per_day` was zero.
    #[error("trades_per_day must be at least 1")]
    ZeroTrades,

    /// `trades_per_day` exceeded the hard limit.
    #[error("trades_per_day {requested} exceeds maximum {max}")]
    TooManyTrades {
        /// Requested trade count.
        requested: usize,
        /// Maximum admissible trade count.
        max: usize,
    },

    /// `business_days` was zero.
    #[error("business_days must be at least 1")]
    ZeroDays,

    /// `business_days` exceeded the hard limit.
    #[error("business_days {requested} exceeds maximum {max}")]
    TooManyDays {
        /// Requested day count.
        requested: usize,
        /// Maximum admissible day count.
        max: usize,
    },

    /// Equity mix outside [0, 1].
    #[error("equity_mix {0} outside [0, 1]")]
    MixOutOfRange(f64),

    /// Counterparty or hour weights empty or summing to zero.
    #[error("{0} weights are empty or sum to zero")]
    DegenerateWeights(&'static str),

    /// Probability cap outside (0, 1].
    #[error("probability cap {0} outside (0, 1]")]
    CapOutOfRange(f64),

    /// Amount dispersion must be strictly positive.
    #[error("amount sigma {0} must be positive and finite")]
    InvalidAmountSigma(f64),

    /// A liquidity draw range was inverted or escaped [0, 1].
    #[error("liquidity range [{lo}, {hi}] invalid")]
    InvalidLiquidityRange {
        /// Lower bound of the offending range.
        lo: f64,
        /// Upper bound of the offending range.
        hi: f64,
    },

    /// The hour-weight window runs past the end of the day.
    #[error("{slots} hour weights overrun the trading day (max {max})")]
    OversizedHourWindow {
        /// Configured weight slots.
        slots: usize,
        /// Largest window fitting between the start hour and midnight.
        max: usize,
    },

    /// A factor or draw parameter was non-finite or non-positive.
    #[error("{name} {value} must be positive and finite")]
    InvalidFactor {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Errors raised while constructing or running a synthesiser.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid synthesis configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The calibration snapshot holds no instruments at all.
    #[error("Calibration snapshot holds no instruments; run calibration first")]
    EmptyUniverse,

    /// Counterparty weight count does not match the desk size.
    #[error("{weights} counterparty weights supplied for a desk of {desk}")]
    WeightCountMismatch {
        /// Number of weights configured.
        weights: usize,
        /// Number of counterparties on the desk.
        desk: usize,
    },

    /// The desk itself was empty.
    #[error("Counterparty desk is empty")]
    EmptyDesk,
}
