//! # forge_market: Market Context Provider
//!
//! Fetches one live volatility signal and normalises it into the stress
//! multiplier of the composite failure probability.
//!
//! The fetch happens **at most once per synthesis run** — fetching per
//! trade would hit external rate limits immediately. Per-trade variability
//! comes from additive jitter inside the synthesiser, not from re-querying
//! the quote source. Any fetch failure (network, timeout, empty payload)
//! degrades to the documented fallback constant.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod provider;

pub use error::MarketError;
pub use provider::{FixedVolatility, HttpIndexSource, VolatilitySource};

use tracing::{info, warn};

/// Index level substituted when the live fetch fails.
pub const FALLBACK_INDEX_VALUE: f64 = 16.50;

/// Calibration baseline the live value is normalised against.
pub const VOLATILITY_BASELINE: f64 = 15.0;

/// Resolved market stress for one synthesis run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StressContext {
    /// Latest close of the volatility index (or the fallback).
    pub index_value: f64,
    /// Normalised stress multiplier, `index_value / 15.0`.
    pub multiplier: f64,
}

impl StressContext {
    /// Builds the context from an index level.
    pub fn from_index_value(value: f64) -> Self {
        let rounded = (value * 100.0).round() / 100.0;
        Self {
            index_value: rounded,
            multiplier: rounded / VOLATILITY_BASELINE,
        }
    }

    /// Neutral context (multiplier 1.0) for tests and offline runs.
    pub fn neutral() -> Self {
        Self {
            index_value: VOLATILITY_BASELINE,
            multiplier: 1.0,
        }
    }
}

/// Resolves the run-level stress context from a volatility source.
///
/// Never fails: any source error is logged and replaced by the documented
/// fallback value. This function is the single place the external quote is
/// consulted.
pub fn resolve_stress(source: &dyn VolatilitySource) -> StressContext {
    let value = match source.latest_close() {
        Ok(value) if value.is_finite() && value > 0.0 => {
            info!("Volatility index close: {:.2}", value);
            value
        }
        Ok(value) => {
            warn!("Unusable index value {value}, using fallback {FALLBACK_INDEX_VALUE}");
            FALLBACK_INDEX_VALUE
        }
        Err(e) => {
            warn!("Volatility fetch failed ({e}), using fallback {FALLBACK_INDEX_VALUE}");
            FALLBACK_INDEX_VALUE
        }
    };
    let context = StressContext::from_index_value(value);
    info!("Base market stress factor: {:.2}x", context.multiplier);
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct FailingSource;

    impl VolatilitySource for FailingSource {
        fn latest_close(&self) -> Result<f64, MarketError> {
            Err(MarketError::EmptyResponse)
        }
    }

    #[test]
    fn test_stress_from_live_value() {
        let context = resolve_stress(&FixedVolatility::new(18.0));
        assert_relative_eq!(context.index_value, 18.0);
        assert_relative_eq!(context.multiplier, 1.2);
    }

    #[test]
    fn test_fallback_on_failure() {
        let context = resolve_stress(&FailingSource);
        assert_relative_eq!(context.index_value, 16.50);
        assert_relative_eq!(context.multiplier, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_fallback_on_nonsense_value() {
        let context = resolve_stress(&FixedVolatility::new(-3.0));
        assert_relative_eq!(context.index_value, 16.50);
    }

    #[test]
    fn test_index_value_rounded_to_cents() {
        let context = resolve_stress(&FixedVolatility::new(17.4567));
        assert_relative_eq!(context.index_value, 17.46);
    }

    #[test]
    fn test_neutral_context() {
        let context = StressContext::neutral();
        assert_relative_eq!(context.multiplier, 1.0);
    }
}
