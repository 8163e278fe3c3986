use super::Trimmer;
use crate::sequence_processor::core::FastqRecord;

/// Removes low quality bases from the 5' end.
#[derive(Debug, Clone)]
pub struct LeadingTrimmer {
    quality: i32,
}

impl LeadingTrimmer {
    pub fn new(quality: i32) -> Self {
        Self { quality }
    }
}

impl Trimmer for LeadingTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        let start = record.quality_scores().position(|q| q >= self.quality)?;
        if start == 0 {
            return Some(record);
        }
        Some(record.trim(start, record.len() - start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trimmers::test_support::record_with_quals;

    #[test]
    fn test_leading() {
        let trimmer = LeadingTrimmer::new(20);

        let rec = trimmer.process_record(record_with_quals("r", &[3, 10, 25, 5, 30])).unwrap();
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.head_pos, 2);

        let untouched = record_with_quals("r", &[20, 2]);
        assert_eq!(trimmer.process_record(untouched.clone()), Some(untouched));

        assert!(trimmer.process_record(record_with_quals("r", &[1, 2, 3])).is_none());
        assert!(trimmer.process_record(record_with_quals("r", &[])).is_none());
    }
}
