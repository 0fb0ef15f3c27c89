//! Error types for the domain foundation.

use thiserror::Error;

/// Validation errors raised when constructing domain records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Currency code not in the supported set.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Fail-rate prior outside the admissible range for the asset class.
    #[error("Fail rate {rate} for '{ticker}' exceeds the {cap} cap for its asset class")]
    FailRateOutOfRange {
        /// Instrument ticker.
        ticker: String,
        /// Offending rate.
        rate: f64,
        /// Class-specific cap.
        cap: f64,
    },

    /// Counterparty credit score outside [300, 850].
    #[error("Credit score {0} outside the [300, 850] range")]
    CreditScoreOutOfRange(u16),

    /// Counterparty historical fail-rate prior outside [0, 1].
    #[error("Counterparty fail-rate prior {0} outside [0, 1]")]
    FailRatePriorOutOfRange(f64),

    /// Empty identifier where one is required.
    #[error("Empty identifier for {0}")]
    EmptyIdentifier(&'static str),

    /// Counterparty identifier is not a 20-character LEI-like token.
    #[error("Counterparty id '{0}' is not a 20-character LEI-like identifier")]
    InvalidLei(String),
}
