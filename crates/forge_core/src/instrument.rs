//! Calibrated instrument records.

use crate::types::{AssetClass, CoreError, LiquidityProfile};

/// A single calibrated instrument in the snapshot universe.
///
/// Produced by regulatory ingestion and consumed read-only by the
/// synthesiser; the `historical_fail_rate` is the `base_risk` input of the
/// composite failure probability.
///
/// Invariant: the fail rate respects the class cap (0.80 for equities,
/// 0.75 for fixed income), enforced at construction.
///
/// # Examples
///
/// ```
/// use forge_core::instrument::InstrumentRecord;
/// use forge_core::types::{AssetClass, LiquidityProfile};
///
/// let record = InstrumentRecord::new(
///     "AAPL",
///     AssetClass::Equity,
///     0.02,
///     LiquidityProfile::High,
///     "sec_ftd",
/// ).unwrap();
/// assert_eq!(record.ticker(), "AAPL");
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstrumentRecord {
    ticker: String,
    asset_class: AssetClass,
    historical_fail_rate: f64,
    liquidity_profile: LiquidityProfile,
    source: String,
}

impl InstrumentRecord {
    /// Creates a new instrument record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if the ticker is empty or the fail rate is
    /// negative, non-finite, or above the class cap.
    pub fn new(
        ticker: impl Into<String>,
        asset_class: AssetClass,
        historical_fail_rate: f64,
        liquidity_profile: LiquidityProfile,
        source: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let ticker = ticker.into();
        if ticker.is_empty() {
            return Err(CoreError::EmptyIdentifier("instrument ticker"));
        }
        let cap = asset_class.fail_rate_cap();
        if !historical_fail_rate.is_finite()
            || historical_fail_rate < 0.0
            || historical_fail_rate > cap
        {
            return Err(CoreError::FailRateOutOfRange {
                ticker,
                rate: historical_fail_rate,
                cap,
            });
        }
        Ok(Self {
            ticker,
            asset_class,
            historical_fail_rate,
            liquidity_profile,
            source: source.into(),
        })
    }

    /// Returns the unique ticker key.
    #[inline]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Returns the asset class.
    #[inline]
    pub fn asset_class(&self) -> AssetClass {
        self.asset_class
    }

    /// Returns the calibrated fail-rate prior.
    #[inline]
    pub fn historical_fail_rate(&self) -> f64 {
        self.historical_fail_rate
    }

    /// Returns the liquidity bucket.
    #[inline]
    pub fn liquidity_profile(&self) -> LiquidityProfile {
        self.liquidity_profile
    }

    /// Returns the provenance tag (which report seeded this record).
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_record_valid() {
        let record = InstrumentRecord::new(
            "MSFT",
            AssetClass::Equity,
            0.05,
            LiquidityProfile::High,
            "sec_ftd",
        )
        .unwrap();
        assert_eq!(record.ticker(), "MSFT");
        assert_eq!(record.asset_class(), AssetClass::Equity);
        assert_eq!(record.historical_fail_rate(), 0.05);
        assert_eq!(record.source(), "sec_ftd");
    }

    #[test]
    fn test_equity_cap_enforced() {
        let result = InstrumentRecord::new(
            "HOT",
            AssetClass::Equity,
            0.81,
            LiquidityProfile::High,
            "sec_ftd",
        );
        assert!(matches!(result, Err(CoreError::FailRateOutOfRange { .. })));

        // Exactly at the cap is admissible.
        assert!(InstrumentRecord::new(
            "EDGE",
            AssetClass::Equity,
            0.80,
            LiquidityProfile::High,
            "sec_ftd",
        )
        .is_ok());
    }

    #[test]
    fn test_bond_cap_enforced() {
        let result = InstrumentRecord::new(
            "CORP-123456",
            AssetClass::CorporateBond,
            0.76,
            LiquidityProfile::Low,
            "finra_trace",
        );
        assert!(result.is_err());
        assert!(InstrumentRecord::new(
            "CORP-123456",
            AssetClass::CorporateBond,
            0.75,
            LiquidityProfile::Low,
            "finra_trace",
        )
        .is_ok());
    }

    #[test]
    fn test_empty_ticker_rejected() {
        let result = InstrumentRecord::new(
            "",
            AssetClass::Equity,
            0.1,
            LiquidityProfile::High,
            "sec_ftd",
        );
        assert!(matches!(result, Err(CoreError::EmptyIdentifier(_))));
    }

    #[test]
    fn test_nan_fail_rate_rejected() {
        let result = InstrumentRecord::new(
            "NAN",
            AssetClass::Equity,
            f64::NAN,
            LiquidityProfile::High,
            "sec_ftd",
        );
        assert!(result.is_err());
    }
}
