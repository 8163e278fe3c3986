use super::Trimmer;
use crate::sequence_processor::core::FastqRecord;

/// Drops reads shorter than a minimum length.
#[derive(Debug, Clone)]
pub struct MinLenTrimmer {
    min_length: usize,
}

impl MinLenTrimmer {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Trimmer for MinLenTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        (record.len() >= self.min_length).then_some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trimmers::test_support::record_with_quals;

    #[test]
    fn test_min_len() {
        let trimmer = MinLenTrimmer::new(4);
        assert!(trimmer.process_record(record_with_quals("r", &[30; 4])).is_some());
        assert!(trimmer.process_record(record_with_quals("r", &[30; 3])).is_none());
    }
}
