//! # forge_sink: Output Sinks
//!
//! Serialises synthesised instruction batches. Two formats share one
//! [`InstructionSink`] trait:
//!
//! - [`JsonSink`]: record-oriented JSON array, optionally masked for relay
//!   payloads (outcome labels stripped).
//! - [`CsvSink`]: flattened table, one instruction per row.
//!
//! Field names and wire codes come from the serde attributes on
//! [`forge_core::SettlementInstruction`]; the sinks add no renaming of
//! their own.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod csv;
pub mod error;
pub mod json;

pub use crate::csv::CsvSink;
pub use error::SinkError;
pub use json::JsonSink;

use forge_core::SettlementInstruction;

/// A destination for one synthesised batch.
pub trait InstructionSink {
    /// Persists the batch in the sink's format.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] on I/O or serialisation failure.
    fn write_batch(&mut self, batch: &[SettlementInstruction]) -> Result<(), SinkError>;
}
