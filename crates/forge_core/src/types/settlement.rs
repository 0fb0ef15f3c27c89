//! Settlement semantics: direction, status, reason codes, timing flags.
//!
//! The serde representation of every enum here is the ISO-style wire token
//! emitted in the output artifacts, so serialising a record produces the
//! exact codes downstream consumers (and the original corpus) expect.

use std::fmt;

/// Direction of a settlement instruction relative to the instructing party.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Deliver securities against payment.
    #[serde(rename = "DELI")]
    Deliver,
    /// Receive securities against payment.
    #[serde(rename = "RECE")]
    Receive,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Deliver => write!(f, "DELI"),
            Direction::Receive => write!(f, "RECE"),
        }
    }
}

/// Terminal status of a synthesised settlement instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SettlementStatus {
    /// Instruction is pending and expected to fail.
    #[serde(rename = "PENF")]
    PendingFail,
    /// Instruction settled as scheduled.
    #[serde(rename = "ACSC")]
    Settled,
}

impl SettlementStatus {
    /// Returns whether this status represents a failure.
    #[inline]
    pub fn is_fail(&self) -> bool {
        matches!(self, SettlementStatus::PendingFail)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementStatus::PendingFail => write!(f, "PENF"),
            SettlementStatus::Settled => write!(f, "ACSC"),
        }
    }
}

/// Reason code attached to a failed instruction.
///
/// Inference rules (deliver side keys off asset liquidity, receive side
/// off counterparty credit):
///
/// - `Deliver` + liquidity score < 0.5 → `InsufficientSecurities`
/// - `Deliver` otherwise → `LateDelivery`
/// - `Receive` + credit score < 650 → `CashShortfall`
/// - `Receive` otherwise → `OperationalCloseout`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReasonCode {
    /// Seller could not source the securities.
    #[serde(rename = "INSU")]
    InsufficientSecurities,
    /// Securities arrived after the settlement cutoff.
    #[serde(rename = "LATE")]
    LateDelivery,
    /// Buyer could not fund the cash leg.
    #[serde(rename = "CASH")]
    CashShortfall,
    /// Instruction closed out operationally.
    #[serde(rename = "CLOS")]
    OperationalCloseout,
}

impl ReasonCode {
    /// Infers the reason code for a failed instruction.
    ///
    /// # Arguments
    ///
    /// * `direction` - Instruction direction
    /// * `liquidity_score` - Asset liquidity score in [0, 1]
    /// * `credit_score` - Counterparty credit score in [300, 850]
    pub fn infer(direction: Direction, liquidity_score: f64, credit_score: u16) -> Self {
        match direction {
            Direction::Deliver => {
                if liquidity_score < 0.5 {
                    ReasonCode::InsufficientSecurities
                } else {
                    ReasonCode::LateDelivery
                }
            }
            Direction::Receive => {
                if credit_score < 650 {
                    ReasonCode::CashShortfall
                } else {
                    ReasonCode::OperationalCloseout
                }
            }
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ReasonCode::InsufficientSecurities => "INSU",
            ReasonCode::LateDelivery => "LATE",
            ReasonCode::CashShortfall => "CASH",
            ReasonCode::OperationalCloseout => "CLOS",
        };
        write!(f, "{}", code)
    }
}

/// Position of the preparation time within the business day.
///
/// Risk concentrates near the 15:00 settlement cutoff; the flag feeds the
/// time factor of the composite failure probability.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TimeOfDayFlag {
    /// Prepared during normal market hours (before 15:00).
    #[serde(rename = "Market_Hours")]
    MarketHours,
    /// Prepared at or after the 15:00 cutoff hour.
    #[serde(rename = "Near_Cutoff")]
    NearCutoff,
}

impl TimeOfDayFlag {
    /// Classifies an hour-of-day (24h clock) against the cutoff.
    #[inline]
    pub fn from_hour(hour: u32) -> Self {
        if hour >= 15 {
            TimeOfDayFlag::NearCutoff
        } else {
            TimeOfDayFlag::MarketHours
        }
    }

    /// Returns whether this flag marks the near-cutoff window.
    #[inline]
    pub fn is_near_cutoff(&self) -> bool {
        matches!(self, TimeOfDayFlag::NearCutoff)
    }
}

impl fmt::Display for TimeOfDayFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOfDayFlag::MarketHours => write!(f, "Market_Hours"),
            TimeOfDayFlag::NearCutoff => write!(f, "Near_Cutoff"),
        }
    }
}
