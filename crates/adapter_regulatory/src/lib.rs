//! # adapter_regulatory: Regulatory Disclosure Ingestion
//!
//! Adapter-layer crate that distils real regulatory disclosures into the
//! raw statistics the calibration store aggregates:
//!
//! - [`equity`] — equity fails-to-deliver tables (pipe-delimited, legacy
//!   8-bit encoding, trailing footer rows) → normalised per-symbol risk
//!   scores with mean 1.0.
//! - [`bond`] — the bond trading-volume table (semicolon-delimited) →
//!   market-wide context plus an expanded universe of synthetic
//!   per-product sub-instruments.
//! - [`efficiency`] — the systemic clearing-efficiency constant, from
//!   either the named-regime table (canonical) or a percentage-token scan
//!   of unstructured report text.
//!
//! Ingestion is deliberately forgiving: a malformed file is logged and
//! isolated, malformed rows are coerced or skipped, and the bond branch
//! degrades to documented defaults. Nothing in this crate aborts a run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bond;
pub mod efficiency;
pub mod equity;
pub mod error;

pub use bond::{BondMarketCalibration, BondVolumeIngester, LiquidityStepPolicy};
pub use efficiency::{EfficiencySource, Regime};
pub use equity::{EquityCalibration, EquityFtdIngester};
pub use error::IngestError;
