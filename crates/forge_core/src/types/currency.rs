//! Settlement currency codes.
//!
//! The synthesiser currently settles everything in USD, but the type keeps
//! the major currencies so snapshots and instructions carry an explicit
//! ISO 4217 code rather than a bare string.

use std::fmt;
use std::str::FromStr;

use super::error::CoreError;

/// ISO 4217 settlement currency.
///
/// # Examples
///
/// ```
/// use forge_core::types::Currency;
///
/// assert_eq!(Currency::USD.code(), "USD");
/// let eur: Currency = "eur".parse().unwrap();
/// assert_eq!(eur, Currency::EUR);
/// ```
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Currency {
    /// United States Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
}

impl Currency {
    /// Returns the ISO 4217 three-letter currency code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    /// Parses an ISO 4217 currency code (case-insensitive).
    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            _ => Err(CoreError::UnknownCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
