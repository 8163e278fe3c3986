use super::Trimmer;
use crate::sequence_processor::core::FastqRecord;

/// Drops reads whose mean quality is below a threshold.
#[derive(Debug, Clone)]
pub struct AvgQualTrimmer {
    quality: i32,
}

impl AvgQualTrimmer {
    pub fn new(quality: i32) -> Self {
        Self { quality }
    }
}

impl Trimmer for AvgQualTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        if record.is_empty() {
            return None;
        }
        let total: i64 = record.quality_scores().map(i64::from).sum();
        (total >= self.quality as i64 * record.len() as i64).then_some(record)
    }
}
