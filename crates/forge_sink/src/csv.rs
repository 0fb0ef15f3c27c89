//! Flattened tabular CSV sink.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use forge_core::SettlementInstruction;

use crate::error::SinkError;
use crate::InstructionSink;

/// Writes a batch as one CSV table, one instruction per row.
///
/// Headers come from the wire schema of the record, so the column names
/// match the JSON field names exactly. A failed instruction leaves its
/// `ISO_ReasonCode` cell empty when settled.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Creates a sink writing to `path`.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvSink<W> {
    /// Creates a sink over any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl<W: Write> InstructionSink for CsvSink<W> {
    fn write_batch(&mut self, batch: &[SettlementInstruction]) -> Result<(), SinkError> {
        for instruction in batch {
            self.writer.serialize(instruction)?;
        }
        self.writer.flush()?;
        info!(records = batch.len(), "CSV batch written");
        Ok(())
    }
}
