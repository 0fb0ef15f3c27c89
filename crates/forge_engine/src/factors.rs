//! The composite failure-probability factor model.
//!
//! Each synthesised trade assembles a [`RiskFactors`] from its calibrated
//! prior and the multiplicative risk amplifiers, then draws its outcome
//! against the resulting probability:
//!
//! ```text
//! p = min(base_risk × stress × counterparty × liquidity × time × size
//!         + systemic_baseline, cap)
//! ```
//!
//! The multiplicative factors amplify the instrument's own prior; the
//! systemic baseline is additive so that even a pristine trade carries the
//! market-wide residual fail rate.

use forge_core::SettlementStatus;

use crate::rng::ForgeRng;

/// Inputs to the composite failure probability of one trade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskFactors {
    /// Calibrated instrument fail-rate prior.
    pub base_risk: f64,
    /// Jittered market stress multiplier.
    pub stress_factor: f64,
    /// Counterparty credit multiplier, ≥ 1.0.
    pub counterparty_factor: f64,
    /// Asset liquidity multiplier, ≥ 1.0.
    pub liquidity_factor: f64,
    /// Time-of-day multiplier (cutoff pressure).
    pub time_factor: f64,
    /// Block-trade size multiplier.
    pub size_factor: f64,
    /// Additive market-wide residual, `1 − systemic efficiency`.
    pub systemic_baseline: f64,
}

impl RiskFactors {
    /// Composite failure probability, capped at `cap` and floored at zero.
    pub fn composite_probability(&self, cap: f64) -> f64 {
        let amplified = self.base_risk
            * self.stress_factor
            * self.counterparty_factor
            * self.liquidity_factor
            * self.time_factor
            * self.size_factor;
        (amplified + self.systemic_baseline).min(cap).max(0.0)
    }
}

/// Asset liquidity multiplier from a liquidity score in [0, 1].
///
/// `max(1.0, (1 − score) × 4)`: scores above 0.75 carry no penalty, a 0.30
/// score yields a 2.8× multiplier.
#[inline]
pub fn liquidity_factor(liquidity_score: f64) -> f64 {
    ((1.0 - liquidity_score) * 4.0).max(1.0)
}

/// Resolves the trade outcome from one uniform draw in [0, 1).
///
/// The draw fails iff it lands strictly below the composite probability.
#[inline]
pub fn decide_status(probability: f64, draw: f64) -> SettlementStatus {
    if draw < probability {
        SettlementStatus::PendingFail
    } else {
        SettlementStatus::Settled
    }
}

/// Applies additive normal jitter to the run-level stress multiplier.
///
/// The result is floored at `floor` and rounded to three decimal places,
/// giving each trade its own `Market_Volatility_Factor` without re-querying
/// the quote source.
pub fn jittered_stress(base: f64, sigma: f64, floor: f64, rng: &mut ForgeRng) -> f64 {
    let jittered = (base + rng.gen_normal() * sigma).max(floor);
    (jittered * 1_000.0).round() / 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn neutral(base_risk: f64, baseline: f64) -> RiskFactors {
        RiskFactors {
            base_risk,
            stress_factor: 1.0,
            counterparty_factor: 1.0,
            liquidity_factor: 1.0,
            time_factor: 1.0,
            size_factor: 1.0,
            systemic_baseline: baseline,
        }
    }

    #[test]
    fn test_reference_scenario_probability() {
        // base 0.10, all factors neutral, baseline 0.0331.
        let factors = RiskFactors {
            liquidity_factor: liquidity_factor(0.90),
            ..neutral(0.10, 0.0331)
        };
        assert_relative_eq!(factors.composite_probability(0.98), 0.1331, epsilon = 1e-12);
    }

    #[test]
    fn test_reference_scenario_outcomes() {
        let p = 0.1331;
        assert_eq!(decide_status(p, 0.05), SettlementStatus::PendingFail);
        assert_eq!(decide_status(p, 0.50), SettlementStatus::Settled);
    }

    #[test]
    fn test_cap_binds() {
        let factors = RiskFactors {
            counterparty_factor: 3.375,
            liquidity_factor: 2.8,
            time_factor: 1.5,
            size_factor: 2.0,
            ..neutral(0.75, 0.15)
        };
        assert_relative_eq!(factors.composite_probability(0.98), 0.98);
    }

    #[test]
    fn test_liquidity_factor_shape() {
        assert_relative_eq!(liquidity_factor(0.90), 1.0);
        assert_relative_eq!(liquidity_factor(0.75), 1.0);
        assert_relative_eq!(liquidity_factor(0.50), 2.0);
        assert_relative_eq!(liquidity_factor(0.30), 2.8, epsilon = 1e-12);
    }

    #[test]
    fn test_draw_boundary_is_settled() {
        // A draw exactly at p settles: the fail region is [0, p).
        assert_eq!(decide_status(0.25, 0.25), SettlementStatus::Settled);
    }

    #[test]
    fn test_jitter_floor_and_rounding() {
        let mut rng = ForgeRng::from_seed(42);
        for _ in 0..1_000 {
            let stress = jittered_stress(0.52, 0.05, 0.5, &mut rng);
            assert!(stress >= 0.5);
            assert_relative_eq!(stress, (stress * 1_000.0).round() / 1_000.0);
        }
    }

    #[test]
    fn test_jitter_centred_on_base() {
        let mut rng = ForgeRng::from_seed(7);
        let n = 5_000;
        let mean: f64 = (0..n)
            .map(|_| jittered_stress(1.1, 0.05, 0.5, &mut rng))
            .sum::<f64>()
            / f64::from(n);
        assert_relative_eq!(mean, 1.1, epsilon = 0.01);
    }
}
