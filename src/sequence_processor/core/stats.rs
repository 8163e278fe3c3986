use super::mate_pair::{MatePair, PairFate};
use serde::Serialize;

/// Running totals over every processed mate pair.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TrimStats {
    pub input_pairs: u64,
    pub both_kept: u64,
    pub only_mate1_kept: u64,
    pub only_mate2_kept: u64,
    pub dropped: u64,
    pub input_bases: u64,
    pub surviving_bases: u64,
}

impl TrimStats {
    pub fn log_pair(&mut self, original: &MatePair, trimmed: &MatePair) {
        self.input_pairs += 1;

        match trimmed.fate() {
            PairFate::BothKept => self.both_kept += 1,
            PairFate::OnlyMate1 => self.only_mate1_kept += 1,
            PairFate::OnlyMate2 => self.only_mate2_kept += 1,
            PairFate::Dropped => self.dropped += 1,
        }

        for rec in original.mates().into_iter().flatten() {
            self.input_bases += rec.len() as u64;
        }
        for rec in trimmed.mates().into_iter().flatten() {
            self.surviving_bases += rec.len() as u64;
        }
    }

    /// One-line paired-end summary printed at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Input Read Pairs: {} Both Surviving: {} ({}) Forward Only Surviving: {} ({}) Reverse Only Surviving: {} ({}) Dropped: {} ({})",
            self.input_pairs,
            self.both_kept,
            percent(self.both_kept, self.input_pairs),
            self.only_mate1_kept,
            percent(self.only_mate1_kept, self.input_pairs),
            self.only_mate2_kept,
            percent(self.only_mate2_kept, self.input_pairs),
            self.dropped,
            percent(self.dropped, self.input_pairs),
        )
    }

    pub fn bases_summary(&self) -> String {
        format!(
            "Input Bases: {} Surviving Bases: {} ({})",
            self.input_bases,
            self.surviving_bases,
            percent(self.surviving_bases, self.input_bases),
        )
    }
}

fn percent(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", count as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_processor::core::FastqRecord;

    fn rec(seq: &[u8]) -> FastqRecord {
        FastqRecord::new("r", None, seq.to_vec(), vec![b'I'; seq.len()], 33)
    }

    #[test]
    fn test_log_pair_classifies_every_fate() {
        let original = MatePair::new(Some(rec(b"ACGT")), Some(rec(b"TTGCA")));
        let mut stats = TrimStats::default();

        stats.log_pair(&original, &original.clone());
        stats.log_pair(&original, &MatePair::new(Some(rec(b"AC")), None));
        stats.log_pair(&original, &MatePair::new(None, Some(rec(b"TTG"))));
        stats.log_pair(&original, &MatePair::default());

        assert_eq!(stats.input_pairs, 4);
        assert_eq!(stats.both_kept, 1);
        assert_eq!(stats.only_mate1_kept, 1);
        assert_eq!(stats.only_mate2_kept, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.input_bases, 36);
        assert_eq!(stats.surviving_bases, 9 + 2 + 3);
    }

    #[test]
    fn test_summary_formatting() {
        let stats = TrimStats {
            input_pairs: 4,
            both_kept: 2,
            only_mate1_kept: 1,
            only_mate2_kept: 0,
            dropped: 1,
            input_bases: 300,
            surviving_bases: 100,
        };
        assert_eq!(
            stats.summary(),
            "Input Read Pairs: 4 Both Surviving: 2 (50.00%) Forward Only Surviving: 1 (25.00%) Reverse Only Surviving: 0 (0.00%) Dropped: 1 (25.00%)"
        );
        assert_eq!(
            stats.bases_summary(),
            "Input Bases: 300 Surviving Bases: 100 (33.33%)"
        );
        assert!(TrimStats::default().summary().contains("Dropped: 0 (0.00%)"));
    }
}
