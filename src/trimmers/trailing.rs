use super::Trimmer;
use crate::sequence_processor::core::FastqRecord;

/// Removes low quality bases from the 3' end.
#[derive(Debug, Clone)]
pub struct TrailingTrimmer {
    quality: i32,
}

impl TrailingTrimmer {
    pub fn new(quality: i32) -> Self {
        Self { quality }
    }
}

impl Trimmer for TrailingTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        let scores: Vec<i32> = record.quality_scores().collect();
        let last = scores.iter().rposition(|&q| q >= self.quality)?;
        if last + 1 == record.len() {
            return Some(record);
        }
        Some(record.trim(0, last + 1))
    }
}
