//! The synthesised settlement instruction record.
//!
//! Field names follow the wire schema of the output corpus: serialising a
//! record (JSON or flattened CSV) yields exactly the column names a
//! downstream failure-prediction pipeline trains against.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use uuid::Uuid;

use crate::types::{
    AssetClass, Currency, Direction, ReasonCode, SettlementStatus, TimeOfDayFlag,
};

/// One immutable synthesised settlement instruction.
///
/// Created once by the synthesiser and never mutated; batches are totally
/// ordered by `preparation_datetime` before reaching a sink.
///
/// Invariant: `reason_code` is `Some` iff `status` is
/// [`SettlementStatus::PendingFail`] (see [`Self::is_consistent`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SettlementInstruction {
    /// Unique end-to-end transaction reference.
    #[serde(rename = "UETR")]
    pub uetr: Uuid,

    /// When the instruction was prepared (UTC).
    #[serde(rename = "PreparationDateTime")]
    pub preparation_datetime: DateTime<Utc>,

    /// Intended settlement date: preparation + 1 business day (T+1).
    #[serde(rename = "SettlementDate")]
    pub settlement_date: NaiveDate,

    /// Asset class of the instrument.
    #[serde(rename = "Asset_Class")]
    pub asset_class: AssetClass,

    /// Ticker / synthetic ISIN of the instrument.
    #[serde(rename = "Asset_ISIN")]
    pub instrument_ref: String,

    /// Drawn asset liquidity score in [0, 1].
    #[serde(rename = "Asset_Liquidity_Score")]
    pub liquidity_score: f64,

    /// Deliver or receive.
    #[serde(rename = "Direction")]
    pub direction: Direction,

    /// Counterparty short name.
    #[serde(rename = "Counterparty")]
    pub counterparty_ref: String,

    /// Counterparty credit score at draw time.
    #[serde(rename = "Counterparty_Credit_Score")]
    pub counterparty_credit_score: u16,

    /// Counterparty historical fail-rate prior.
    #[serde(rename = "Counterparty_Hist_Fail_Rate")]
    pub counterparty_fail_rate: f64,

    /// Monetary settlement amount.
    #[serde(rename = "SettlementAmount")]
    pub settlement_amount: f64,

    /// Market-hours vs near-cutoff timing flag.
    #[serde(rename = "Time_of_Day_Flag")]
    pub time_of_day_flag: TimeOfDayFlag,

    /// Settlement currency.
    #[serde(rename = "Currency")]
    pub currency: Currency,

    /// Drawn outcome.
    #[serde(rename = "Status")]
    pub status: SettlementStatus,

    /// Reason code, set iff the instruction is a pending fail.
    #[serde(rename = "ISO_ReasonCode")]
    pub reason_code: Option<ReasonCode>,

    /// Snapshot of the stress multiplier seen by this trade.
    #[serde(rename = "Market_Volatility_Factor")]
    pub market_volatility_factor: f64,
}

impl SettlementInstruction {
    /// Checks the reason-code/status invariant.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.reason_code.is_some() == self.status.is_fail()
    }

}

/// Returns the next business day after `date` (weekends roll to Monday).
///
/// Instructions are only prepared Monday through Friday, so a Friday
/// preparation settles the following Monday under T+1.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Days::new(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next = next + Days::new(1);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(status: SettlementStatus, reason: Option<ReasonCode>) -> SettlementInstruction {
        let prep = Utc.with_ymd_and_hms(2025, 11, 24, 14, 30, 0).unwrap();
        SettlementInstruction {
            uetr: Uuid::nil(),
            preparation_datetime: prep,
            settlement_date: next_business_day(prep.date_naive()),
            asset_class: AssetClass::Equity,
            instrument_ref: "AAPL".to_string(),
            liquidity_score: 0.9,
            direction: Direction::Deliver,
            counterparty_ref: "JPM_CHASE_NA".to_string(),
            counterparty_credit_score: 825,
            counterparty_fail_rate: 0.015,
            settlement_amount: 125_000.0,
            time_of_day_flag: TimeOfDayFlag::MarketHours,
            currency: Currency::USD,
            status,
            reason_code: reason,
            market_volatility_factor: 1.1,
        }
    }

    #[test]
    fn test_consistency_invariant() {
        assert!(sample(SettlementStatus::Settled, None).is_consistent());
        assert!(
            sample(SettlementStatus::PendingFail, Some(ReasonCode::LateDelivery)).is_consistent()
        );
        assert!(!sample(SettlementStatus::PendingFail, None).is_consistent());
        assert!(!sample(SettlementStatus::Settled, Some(ReasonCode::LateDelivery)).is_consistent());
    }

    #[test]
    fn test_next_business_day_midweek() {
        // Monday 2025-11-24 -> Tuesday 2025-11-25
        let monday = NaiveDate::from_ymd_opt(2025, 11, 24).unwrap();
        assert_eq!(
            next_business_day(monday),
            NaiveDate::from_ymd_opt(2025, 11, 25).unwrap()
        );
    }

    #[test]
    fn test_next_business_day_friday_rolls_to_monday() {
        let friday = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        assert_eq!(
            next_business_day(friday),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_serialised_field_names() {
        let record = sample(SettlementStatus::Settled, None);
        let json = serde_json::to_value(&record).unwrap();
        for field in [
            "UETR",
            "PreparationDateTime",
            "SettlementDate",
            "Asset_Class",
            "Asset_ISIN",
            "Asset_Liquidity_Score",
            "Direction",
            "Counterparty",
            "Counterparty_Credit_Score",
            "Counterparty_Hist_Fail_Rate",
            "SettlementAmount",
            "Time_of_Day_Flag",
            "Currency",
            "Status",
            "ISO_ReasonCode",
            "Market_Volatility_Factor",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(json["Status"], "ACSC");
        assert_eq!(json["Direction"], "DELI");
    }
}
