use super::Trimmer;
use crate::sequence_processor::core::FastqRecord;

/// Removes a fixed number of bases from the 5' end.
#[derive(Debug, Clone)]
pub struct HeadCropTrimmer {
    length: usize,
}

impl HeadCropTrimmer {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Trimmer for HeadCropTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        if record.len() <= self.length {
            return None;
        }
        if self.length == 0 {
            return Some(record);
        }
        Some(record.trim(self.length, record.len() - self.length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trimmers::test_support::record_with_quals;

    #[test]
    fn test_headcrop() {
        let trimmer = HeadCropTrimmer::new(3);
        let rec = trimmer.process_record(record_with_quals("r", &[30; 8])).unwrap();
        assert_eq!(rec.len(), 5);
        assert_eq!(rec.head_pos, 3);
        assert!(trimmer.process_record(record_with_quals("r", &[30; 3])).is_none());
    }
}
