//! Snapshot construction: the union of the ingestion branches.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use tracing::info;

use forge_core::{InstrumentRecord, MarketContext};

use crate::error::CalibrationError;
use crate::snapshot::{CalibrationSnapshot, SnapshotMetadata, TickerMeta};

/// Builder that merges ingestion output into one immutable snapshot.
///
/// # Examples
///
/// ```
/// use forge_calibration::SnapshotBuilder;
/// use forge_core::{InstrumentRecord, MarketContext};
/// use forge_core::types::{AssetClass, LiquidityProfile};
///
/// let record = InstrumentRecord::new(
///     "AAPL", AssetClass::Equity, 0.02, LiquidityProfile::High, "sec_ftd",
/// ).unwrap();
///
/// let snapshot = SnapshotBuilder::new()
///     .efficiency(0.9669).unwrap()
///     .market_context(MarketContext::default())
///     .add_instruments(vec![record]).unwrap()
///     .build();
/// assert_eq!(snapshot.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    efficiency: f64,
    context: MarketContext,
    instruments: BTreeMap<String, TickerMeta>,
    source_year: Option<String>,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    /// Creates an empty builder with NORMAL-regime efficiency defaults.
    pub fn new() -> Self {
        Self {
            efficiency: 0.9669,
            context: MarketContext::default(),
            instruments: BTreeMap::new(),
            source_year: None,
        }
    }

    /// Sets the systemic efficiency fraction.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::InvalidEfficiency`] outside (0, 1].
    pub fn efficiency(mut self, efficiency: f64) -> Result<Self, CalibrationError> {
        if !efficiency.is_finite() || efficiency <= 0.0 || efficiency > 1.0 {
            return Err(CalibrationError::InvalidEfficiency(efficiency));
        }
        self.efficiency = efficiency;
        Ok(self)
    }

    /// Sets the market-wide bond context.
    pub fn market_context(mut self, context: MarketContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the source-year tag (defaults to the build year).
    pub fn source_year(mut self, year: impl Into<String>) -> Self {
        self.source_year = Some(year.into());
        self
    }

    /// Merges a batch of instrument records into the universe.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DuplicateTicker`] if a ticker is already
    /// present. Bond ids are namespaced by product prefix, so a collision
    /// indicates corrupt ingestion rather than bad luck.
    pub fn add_instruments(
        mut self,
        records: Vec<InstrumentRecord>,
    ) -> Result<Self, CalibrationError> {
        for record in records {
            let ticker = record.ticker().to_string();
            let meta = TickerMeta {
                asset_class: record.asset_class(),
                historical_fail_rate: record.historical_fail_rate(),
                liquidity_profile: record.liquidity_profile(),
                source: record.source().to_string(),
            };
            if self.instruments.insert(ticker.clone(), meta).is_some() {
                return Err(CalibrationError::DuplicateTicker(ticker));
            }
        }
        Ok(self)
    }

    /// Builds the snapshot, stamping the current time.
    pub fn build(self) -> CalibrationSnapshot {
        self.build_at(Utc::now())
    }

    /// Builds the snapshot with an explicit generation timestamp.
    pub fn build_at(self, now: DateTime<Utc>) -> CalibrationSnapshot {
        let metadata = SnapshotMetadata {
            calibration_date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            source_year: self
                .source_year
                .unwrap_or_else(|| now.year().to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        info!(
            "Snapshot built: {} tickers, {:.2}% efficiency",
            self.instruments.len(),
            self.efficiency * 100.0
        );
        CalibrationSnapshot::from_parts(
            metadata,
            self.efficiency,
            self.context,
            self.instruments,
        )
    }
}
