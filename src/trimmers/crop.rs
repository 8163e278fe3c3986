use super::Trimmer;
use crate::sequence_processor::core::FastqRecord;

/// Cuts reads down to a maximum length, keeping the 5' end.
#[derive(Debug, Clone)]
pub struct CropTrimmer {
    length: usize,
}

impl CropTrimmer {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Trimmer for CropTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        if record.len() <= self.length {
            return Some(record);
        }
        Some(record.trim(0, self.length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trimmers::test_support::record_with_quals;

    #[test]
    fn test_crop() {
        let trimmer = CropTrimmer::new(3);
        assert_eq!(trimmer.process_record(record_with_quals("r", &[30; 8])).unwrap().len(), 3);
        assert_eq!(trimmer.process_record(record_with_quals("r", &[30; 2])).unwrap().len(), 2);
    }
}
