use super::record::FastqRecord;
use anyhow::Result;

/// An append-only output destination for trimmed records.
pub trait RecordSink: Send {
    fn write_record(&mut self, record: &FastqRecord) -> Result<()>;

    /// Flush everything written so far. Called once, after the last record.
    fn close(&mut self) -> Result<()>;
}
