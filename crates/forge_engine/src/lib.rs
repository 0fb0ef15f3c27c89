//! # forge_engine: The Trade Synthesiser
//!
//! Layer 3 of the pipeline: turns a calibration snapshot plus a market
//! stress context into batches of synthetic settlement instructions.
//!
//! Every random draw flows through the seeded [`rng::ForgeRng`], so a
//! (seed, configuration, snapshot) triple fully determines the output.
//! Business days are independent shards, generated sequentially or in
//! parallel with identical results.
//!
//! The failure model is multiplicative over an instrument's calibrated
//! prior — stress, counterparty credit, asset liquidity, cutoff timing and
//! block size each amplify it — plus an additive systemic baseline, hard
//! capped at 0.98 (see [`factors`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod factors;
pub mod rng;
pub mod synthesizer;

pub use config::{SynthesisConfig, SynthesisConfigBuilder};
pub use error::{ConfigError, EngineError};
pub use factors::RiskFactors;
pub use rng::ForgeRng;
pub use synthesizer::Synthesizer;
