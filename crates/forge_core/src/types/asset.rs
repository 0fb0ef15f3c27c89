//! Asset classification types.

use std::fmt;

/// Asset class of a calibrated instrument.
///
/// The synthesiser draws equities and fixed income with a configurable
/// class mix; corporate bonds are the fixed-income universe expanded from
/// the bond volume report.
///
/// # Examples
///
/// ```
/// use forge_core::types::AssetClass;
///
/// assert!(AssetClass::Equity.is_equity());
/// assert!(!AssetClass::CorporateBond.is_equity());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AssetClass {
    /// Listed equity, seeded from fails-to-deliver disclosures.
    Equity,
    /// Corporate bond, expanded from the bond trading-volume report.
    CorporateBond,
    /// Other fixed income (non-CORP products from the volume report).
    FixedIncome,
}

impl AssetClass {
    /// Returns whether this is the equity class.
    #[inline]
    pub fn is_equity(&self) -> bool {
        matches!(self, AssetClass::Equity)
    }

    /// Returns whether this class settles on the fixed-income side of the
    /// model (everything that is not equity).
    #[inline]
    pub fn is_fixed_income(&self) -> bool {
        !self.is_equity()
    }

    /// Maximum admissible calibrated fail-rate prior for this class.
    ///
    /// Equity priors are capped at 0.80, fixed-income priors at 0.75.
    #[inline]
    pub fn fail_rate_cap(&self) -> f64 {
        match self {
            AssetClass::Equity => 0.80,
            AssetClass::CorporateBond | AssetClass::FixedIncome => 0.75,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetClass::Equity => "Equity",
            AssetClass::CorporateBond => "CorporateBond",
            AssetClass::FixedIncome => "FixedIncome",
        };
        write!(f, "{}", name)
    }
}

/// Coarse liquidity bucket attached to a calibrated instrument.
///
/// Bond sub-instruments are bucketed by the product's average daily volume;
/// equities from the fails-to-deliver universe are treated as `High`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LiquidityProfile {
    /// Thinly traded (bond products below the volume threshold).
    Low,
    /// Moderately traded.
    Medium,
    /// Deeply traded (listed equities).
    High,
}

impl fmt::Display for LiquidityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiquidityProfile::Low => "Low",
            LiquidityProfile::Medium => "Medium",
            LiquidityProfile::High => "High",
        };
        write!(f, "{}", name)
    }
}
