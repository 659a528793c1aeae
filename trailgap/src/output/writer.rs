//! Record sinks.

use std::io::Write;

use thiserror::Error;

use super::record::OutputRecord;

/// ASCII record separator prefixed to every record.
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// Errors writing records.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for emitted records.
pub trait RecordSink {
    fn emit(&mut self, record: &OutputRecord) -> Result<(), OutputError>;
}

/// Collects records in memory.
impl RecordSink for Vec<OutputRecord> {
    fn emit(&mut self, record: &OutputRecord) -> Result<(), OutputError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes records as a GeoJSON text sequence, flushing after each one so an
/// interrupted run keeps everything emitted so far.
pub struct GeoJsonSeqWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> GeoJsonSeqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Number of records written.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RecordSink for GeoJsonSeqWriter<W> {
    fn emit(&mut self, record: &OutputRecord) -> Result<(), OutputError> {
        let mut line = Vec::with_capacity(512);
        line.push(RECORD_SEPARATOR);
        serde_json::to_writer(&mut line, record)?;
        line.push(b'\n');

        self.inner.write_all(&line)?;
        self.inner.flush()?;
        self.written += 1;
        Ok(())
    }
}
