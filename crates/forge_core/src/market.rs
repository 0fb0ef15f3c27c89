//! Market-wide bond context.

/// Market-wide corporate-bond trading context from the volume report.
///
/// `avg_daily_volume_m` is in millions of currency units; the liquidity
/// multiplier is a step function of that volume (≥ 1.0, higher when the
/// market is thin) chosen by the ingestion policy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketContext {
    /// Average daily par value traded, in millions.
    pub avg_daily_volume_m: f64,
    /// Systemic liquidity multiplier, ≥ 1.0.
    pub liquidity_multiplier: f64,
}

impl MarketContext {
    /// Documented fallback when the bond volume report is unavailable.
    pub const FALLBACK_ADV_M: f64 = 45_000.0;

    /// Fixed-income trade cap as a fraction of daily volume.
    const FI_CAP_FRACTION: f64 = 0.005;

    /// Creates a new market context, clamping the multiplier to ≥ 1.0.
    pub fn new(avg_daily_volume_m: f64, liquidity_multiplier: f64) -> Self {
        Self {
            avg_daily_volume_m: avg_daily_volume_m.max(0.0),
            liquidity_multiplier: liquidity_multiplier.max(1.0),
        }
    }

    /// Maximum realistic fixed-income trade size in currency units:
    /// 0.5% of the average daily volume.
    #[inline]
    pub fn max_fi_trade_amount(&self) -> f64 {
        self.avg_daily_volume_m * 1_000_000.0 * Self::FI_CAP_FRACTION
    }
}

impl Default for MarketContext {
    /// The documented ingestion fallback: ADV 45,000(M), multiplier 1.0.
    fn default() -> Self {
        Self {
            avg_daily_volume_m: Self::FALLBACK_ADV_M,
            liquidity_multiplier: 1.0,
        }
    }
}
