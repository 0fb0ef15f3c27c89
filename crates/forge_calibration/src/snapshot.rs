//! The immutable calibration snapshot.

use std::collections::BTreeMap;

use forge_core::types::{AssetClass, LiquidityProfile};
use forge_core::MarketContext;

/// Generation metadata stamped onto a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotMetadata {
    /// Generation timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub calibration_date: String,
    /// Year of the underlying disclosures.
    pub source_year: String,
    /// Version tag of the calibrating binary.
    pub version: String,
}

/// Per-ticker calibration attributes, keyed externally by ticker.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickerMeta {
    /// Asset class of the instrument.
    pub asset_class: AssetClass,
    /// Calibrated fail-rate prior (the synthesiser's `base_risk`).
    pub historical_fail_rate: f64,
    /// Coarse liquidity bucket.
    pub liquidity_profile: LiquidityProfile,
    /// Provenance tag (which report seeded this entry).
    pub source: String,
}

/// Immutable aggregate of everything synthesis needs: per-instrument
/// priors, market-wide bond context, systemic efficiency, metadata.
///
/// Built once by [`crate::SnapshotBuilder`], persisted as JSON, and
/// consumed read-only. Ticker keys are unique by construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationSnapshot {
    metadata: SnapshotMetadata,
    systemic_efficiency: f64,
    bond_market_context: MarketContext,
    ticker_metadata: BTreeMap<String, TickerMeta>,
}

impl CalibrationSnapshot {
    pub(crate) fn from_parts(
        metadata: SnapshotMetadata,
        systemic_efficiency: f64,
        bond_market_context: MarketContext,
        ticker_metadata: BTreeMap<String, TickerMeta>,
    ) -> Self {
        Self {
            metadata,
            systemic_efficiency,
            bond_market_context,
            ticker_metadata,
        }
    }

    /// Returns the generation metadata.
    #[inline]
    pub fn metadata(&self) -> &SnapshotMetadata {
        &self.metadata
    }

    /// Returns the systemic clearing efficiency in (0, 1].
    #[inline]
    pub fn systemic_efficiency(&self) -> f64 {
        self.systemic_efficiency
    }

    /// Derived additive fail baseline, `max(0, 1 − efficiency)`.
    #[inline]
    pub fn fail_baseline(&self) -> f64 {
        (1.0 - self.systemic_efficiency).max(0.0)
    }

    /// Returns the market-wide bond context.
    #[inline]
    pub fn bond_market_context(&self) -> &MarketContext {
        &self.bond_market_context
    }

    /// Returns the full ticker universe.
    #[inline]
    pub fn ticker_metadata(&self) -> &BTreeMap<String, TickerMeta> {
        &self.ticker_metadata
    }

    /// Number of calibrated instruments.
    #[inline]
    pub fn len(&self) -> usize {
        self.ticker_metadata.len()
    }

    /// Returns whether the universe is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ticker_metadata.is_empty()
    }

    /// Tickers in the equity universe.
    pub fn equity_tickers(&self) -> Vec<&str> {
        self.ticker_metadata
            .iter()
            .filter(|(_, meta)| meta.asset_class.is_equity())
            .map(|(ticker, _)| ticker.as_str())
            .collect()
    }

    /// Tickers in the fixed-income universe (everything non-equity).
    pub fn fixed_income_tickers(&self) -> Vec<&str> {
        self.ticker_metadata
            .iter()
            .filter(|(_, meta)| meta.asset_class.is_fixed_income())
            .map(|(ticker, _)| ticker.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn meta(class: AssetClass, rate: f64) -> TickerMeta {
        TickerMeta {
            asset_class: class,
            historical_fail_rate: rate,
            liquidity_profile: LiquidityProfile::High,
            source: "test".to_string(),
        }
    }

    fn sample() -> CalibrationSnapshot {
        let mut tickers = BTreeMap::new();
        tickers.insert("AAPL".to_string(), meta(AssetClass::Equity, 0.02));
        tickers.insert("CORP-000001".to_string(), meta(AssetClass::CorporateBond, 0.05));
        tickers.insert("AGCY-000002".to_string(), meta(AssetClass::FixedIncome, 0.04));
        CalibrationSnapshot::from_parts(
            SnapshotMetadata {
                calibration_date: "2025-11-24 10:00:00".to_string(),
                source_year: "2025".to_string(),
                version: "0.1.0".to_string(),
            },
            0.9669,
            MarketContext::default(),
            tickers,
        )
    }

    #[test]
    fn test_fail_baseline() {
        assert_relative_eq!(sample().fail_baseline(), 0.0331, epsilon = 1e-12);
    }

    #[test]
    fn test_class_partitions() {
        let snapshot = sample();
        assert_eq!(snapshot.equity_tickers(), vec!["AAPL"]);
        assert_eq!(
            snapshot.fixed_income_tickers(),
            vec!["AGCY-000002", "CORP-000001"]
        );
    }

    #[test]
    fn test_serialised_schema_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json["metadata"]["calibration_date"].is_string());
        assert!(json["metadata"]["source_year"].is_string());
        assert!(json["metadata"]["version"].is_string());
        assert!(json["systemic_efficiency"].is_number());
        assert!(json["bond_market_context"]["avg_daily_volume_m"].is_number());
        assert!(json["bond_market_context"]["liquidity_multiplier"].is_number());
        assert!(json["ticker_metadata"]["AAPL"]["historical_fail_rate"].is_number());
        assert_eq!(json["ticker_metadata"]["AAPL"]["asset_class"], "Equity");
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: CalibrationSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
