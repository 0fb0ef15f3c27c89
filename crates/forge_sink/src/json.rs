//! Record-oriented JSON sink.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use forge_core::SettlementInstruction;

use crate::error::SinkError;
use crate::InstructionSink;

/// Outcome fields stripped from masked relay payloads.
const MASKED_FIELDS: [&str; 2] = ["Status", "ISO_ReasonCode"];

/// Writes a batch as one pretty-printed JSON array of records.
///
/// In masked mode the outcome labels (`Status`, `ISO_ReasonCode`) are
/// omitted from every record, producing the payload shape relayed to
/// downstream prediction consumers.
pub struct JsonSink<W: Write> {
    writer: W,
    masked: bool,
}

impl JsonSink<BufWriter<File>> {
    /// Creates a full-fidelity sink writing to `path`.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonSink<W> {
    /// Creates a full-fidelity sink over any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            masked: false,
        }
    }

    /// Switches the sink to masked relay payloads.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }
}

impl<W: Write> InstructionSink for JsonSink<W> {
    fn write_batch(&mut self, batch: &[SettlementInstruction]) -> Result<(), SinkError> {
        let mut records = Vec::with_capacity(batch.len());
        for instruction in batch {
            let mut value = serde_json::to_value(instruction)?;
            if self.masked {
                if let Some(object) = value.as_object_mut() {
                    for field in MASKED_FIELDS {
                        object.remove(field);
                    }
                }
            }
            records.push(value);
        }
        serde_json::to_writer_pretty(&mut self.writer, &records)?;
        self.writer.flush()?;
        info!(
            records = batch.len(),
            masked = self.masked,
            "JSON batch written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_batch;

    #[test]
    fn test_full_payload_carries_outcome_fields() {
        let mut buffer = Vec::new();
        JsonSink::new(&mut buffer)
            .write_batch(&sample_batch())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let records = parsed.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].get("Status").is_some());
        assert!(records[0].get("ISO_ReasonCode").is_some());
        assert!(records[0].get("UETR").is_some());
    }

    #[test]
    fn test_masked_payload_strips_outcome_fields() {
        let mut buffer = Vec::new();
        JsonSink::new(&mut buffer)
            .masked()
            .write_batch(&sample_batch())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        for record in parsed.as_array().unwrap() {
            assert!(record.get("Status").is_none());
            assert!(record.get("ISO_ReasonCode").is_none());
            // Feature fields survive masking.
            assert!(record.get("SettlementAmount").is_some());
            assert!(record.get("Counterparty").is_some());
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let batch = sample_batch();
        JsonSink::create(&path).unwrap().write_batch(&batch).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<SettlementInstruction> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, batch);
    }
}
