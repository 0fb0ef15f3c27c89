//! # forge_core: Domain Foundation for the SettleForge Synthesiser
//!
//! ## Layer 1 (Foundation) Role
//!
//! forge_core is the bottom layer of the A-F-S architecture, providing:
//! - Closed enumerations for settlement semantics (`types`)
//! - Calibrated instrument records (`instrument`)
//! - Static counterparty reference data (`counterparty`)
//! - The immutable output record (`instruction`)
//! - Error types: `CoreError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other forge_* crates, with minimal
//! external dependencies:
//! - chrono: timestamp and settlement-date arithmetic
//! - serde: serialisation of records and wire codes
//! - uuid: instruction reference ids
//!
//! All enumerations carry their ISO-style wire codes through serde, so a
//! serialised record matches the field values downstream consumers expect
//! (`PENF`/`ACSC`, `DELI`/`RECE`, `Near_Cutoff`/`Market_Hours`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod counterparty;
pub mod instruction;
pub mod instrument;
pub mod market;
pub mod types;

pub use counterparty::Counterparty;
pub use instruction::SettlementInstruction;
pub use instrument::InstrumentRecord;
pub use market::MarketContext;
pub use types::{
    AssetClass, CoreError, Currency, Direction, LiquidityProfile, ReasonCode, SettlementStatus,
    TimeOfDayFlag,
};
