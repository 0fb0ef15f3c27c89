//! Core type definitions for settlement synthesis.
//!
//! All enumerations here are closed: the synthesiser never produces a code
//! outside these variants, and the wire form (serde representation) is the
//! exact token downstream consumers see in the output artifacts.

pub mod asset;
pub mod currency;
pub mod error;
pub mod settlement;

pub use asset::{AssetClass, LiquidityProfile};
pub use currency::Currency;
pub use error::CoreError;
pub use settlement::{Direction, ReasonCode, SettlementStatus, TimeOfDayFlag};
