use super::Trimmer;
use crate::sequence_processor::core::FastqRecord;

/// Scans from the 5' end and cuts the read where the mean quality of a
/// window first drops below the threshold, then removes any remaining
/// trailing bases below it. Reads shorter than the window are kept as is.
#[derive(Debug, Clone)]
pub struct SlidingWindowTrimmer {
    window: usize,
    quality: i32,
}

impl SlidingWindowTrimmer {
    pub fn new(window: usize, quality: i32) -> Self {
        Self { window, quality }
    }

    fn length_to_keep(&self, scores: &[i32]) -> usize {
        let required = self.quality * self.window as i32;
        let mut total: i32 = scores[..self.window].iter().sum();
        if total < required {
            return 0;
        }

        let mut keep = scores.len();
        for start in 1..=scores.len() - self.window {
            total += scores[start + self.window - 1] - scores[start - 1];
            if total < required {
                keep = start;
                break;
            }
        }

        while keep > 0 && scores[keep - 1] < self.quality {
            keep -= 1;
        }
        keep
    }
}

impl Trimmer for SlidingWindowTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        if self.window == 0 || record.len() < self.window {
            return Some(record);
        }

        let scores: Vec<i32> = record.quality_scores().collect();
        match self.length_to_keep(&scores) {
            0 => None,
            keep if keep == record.len() => Some(record),
            keep => Some(record.trim(0, keep)),
        }
    }
}
