//! Counterparty reference data.
//!
//! Counterparties are a static reference list, not derived from the
//! regulatory files. The default desk carries five institutions spanning
//! the credit spectrum so the credit factor of the failure model has
//! something to bite on.

use crate::types::CoreError;

/// A settlement counterparty with credit attributes.
///
/// # Examples
///
/// ```
/// use forge_core::counterparty::Counterparty;
///
/// let cp = Counterparty::new("2138006M8651AB3C9D47", "JPM_CHASE_NA", 825, 0.015).unwrap();
/// assert_eq!(cp.credit_score(), 825);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Counterparty {
    id: String,
    name: String,
    credit_score: u16,
    historical_fail_rate: f64,
}

impl Counterparty {
    /// Creates a new counterparty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if the id is not a 20-character LEI-like
    /// token, the name is empty, the credit score falls outside [300, 850],
    /// or the fail-rate prior falls outside [0, 1].
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        credit_score: u16,
        historical_fail_rate: f64,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        let name = name.into();
        if id.len() != 20 {
            return Err(CoreError::InvalidLei(id));
        }
        if name.is_empty() {
            return Err(CoreError::EmptyIdentifier("counterparty name"));
        }
        if !(300..=850).contains(&credit_score) {
            return Err(CoreError::CreditScoreOutOfRange(credit_score));
        }
        if !historical_fail_rate.is_finite() || !(0.0..=1.0).contains(&historical_fail_rate) {
            return Err(CoreError::FailRatePriorOutOfRange(historical_fail_rate));
        }
        Ok(Self {
            id,
            name,
            credit_score,
            historical_fail_rate,
        })
    }

    /// Returns the LEI-like institutional identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the counterparty short name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the credit score in [300, 850].
    #[inline]
    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    /// Returns the historical fail-rate prior.
    #[inline]
    pub fn historical_fail_rate(&self) -> f64 {
        self.historical_fail_rate
    }

    /// Credit multiplier applied in the composite failure probability.
    ///
    /// `max(1.0, (850 − score) / 80)`: scores above roughly 770 carry no
    /// penalty; a 580 score yields a 3.375× multiplier.
    #[inline]
    pub fn credit_factor(&self) -> f64 {
        ((850.0 - f64::from(self.credit_score)) / 80.0).max(1.0)
    }
}

/// The default counterparty desk.
///
/// Weights used by the synthesiser (30/30/20/15/5) put most of the flow
/// through the higher-quality names, with a thin tail through the
/// high-risk fund.
pub fn reference_desk() -> Vec<Counterparty> {
    vec![
        Counterparty::new("2138006M8651AB3C9D47", "JPM_CHASE_NA", 825, 0.015)
            .expect("static reference data"),
        Counterparty::new("5493001KJX12H7P2QM18", "GOLDMAN_SACHS_INTL", 810, 0.018)
            .expect("static reference data"),
        Counterparty::new("7LR9S95S8L34T6W1VN55", "NOMURA_INTL", 760, 0.025)
            .expect("static reference data"),
        Counterparty::new("549300675865R2D8KF09", "BARCLAYS_CAPITAL", 780, 0.022)
            .expect("static reference data"),
        Counterparty::new("213800VZW961G4J5XS72", "BEYOND_ALPHA_HF", 580, 0.120)
            .expect("static reference data"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TEST_LEI: &str = "5493001KJX12H7P2QM18";

    #[test]
    fn test_counterparty_valid() {
        let cp =
            Counterparty::new("549300675865R2D8KF09", "BARCLAYS_CAPITAL", 780, 0.022).unwrap();
        assert_eq!(cp.id(), "549300675865R2D8KF09");
        assert_eq!(cp.name(), "BARCLAYS_CAPITAL");
        assert_eq!(cp.credit_score(), 780);
    }

    #[test]
    fn test_short_id_rejected() {
        let result = Counterparty::new("2138006M8651", "JPM_CHASE_NA", 825, 0.015);
        assert!(matches!(result, Err(CoreError::InvalidLei(_))));
    }

    #[test]
    fn test_credit_score_bounds() {
        assert!(Counterparty::new(TEST_LEI, "LOW", 299, 0.1).is_err());
        assert!(Counterparty::new(TEST_LEI, "LOW", 300, 0.1).is_ok());
        assert!(Counterparty::new(TEST_LEI, "HIGH", 850, 0.1).is_ok());
        assert!(Counterparty::new(TEST_LEI, "HIGH", 851, 0.1).is_err());
    }

    #[test]
    fn test_fail_rate_prior_bounds() {
        assert!(Counterparty::new(TEST_LEI, "CP", 700, -0.01).is_err());
        assert!(Counterparty::new(TEST_LEI, "CP", 700, 1.01).is_err());
        assert!(Counterparty::new(TEST_LEI, "CP", 700, 0.0).is_ok());
    }

    #[test]
    fn test_credit_factor_top_score_no_penalty() {
        let cp = Counterparty::new(TEST_LEI, "PRIME", 850, 0.01).unwrap();
        assert_relative_eq!(cp.credit_factor(), 1.0);
        // 825 is still inside the no-penalty region.
        let cp = Counterparty::new(TEST_LEI, "PRIME", 825, 0.01).unwrap();
        assert_relative_eq!(cp.credit_factor(), 1.0);
    }

    #[test]
    fn test_credit_factor_weak_score() {
        let cp = Counterparty::new(TEST_LEI, "RISKY", 580, 0.12).unwrap();
        assert_relative_eq!(cp.credit_factor(), 3.375);
    }

    #[test]
    fn test_reference_desk_shape() {
        let desk = reference_desk();
        assert_eq!(desk.len(), 5);
        let mut ids: Vec<&str> = desk.iter().map(|c| c.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        for cp in &desk {
            assert_eq!(cp.id().len(), 20);
        }
    }
}
