use super::record::FastqRecord;
use anyhow::Result;

/// A finite, non-restartable stream of decoded records.
///
/// `Ok(None)` marks the end of the stream; a decode failure is returned as
/// an error and ends the stream as far as the pipeline is concerned.
/// Dropping the source closes it.
pub trait RecordSource: Send {
    fn next_record(&mut self) -> Result<Option<FastqRecord>>;

    /// Name used in diagnostics, usually the input path.
    fn source_name(&self) -> &str;
}
