//! # forge_calibration: The Calibration Store
//!
//! Pure aggregation layer: merges the equity and bond instrument universes
//! into one snapshot keyed by ticker, attaches the market-wide bond
//! context and the systemic efficiency constant, and stamps generation
//! metadata. No computation happens here beyond the union and a few
//! derived scalars (`fail_baseline = 1 − efficiency`).
//!
//! The snapshot is immutable once built and is the single source of priors
//! for the synthesiser. A missing snapshot at synthesis time is the one
//! fatal condition in the pipeline.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod persist;
pub mod snapshot;
pub mod store;

pub use error::CalibrationError;
pub use persist::{load_snapshot, save_snapshot};
pub use snapshot::{CalibrationSnapshot, SnapshotMetadata, TickerMeta};
pub use store::SnapshotBuilder;
