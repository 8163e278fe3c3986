use super::Trimmer;
use crate::error::TrimError;
use crate::sequence_processor::core::{FastqRecord, MatePair};
use anyhow::{Context, Result};
use bio::io::fasta;
use std::path::Path;

const MATCH_SCORE: f32 = 0.602_06; // log10(4)
const SEED_LENGTH: usize = 16;

/// Which mate an adapter applies to, from its FASTA name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdapterTarget {
    Mate1,
    Mate2,
    Both,
}

#[derive(Debug, Clone)]
struct Adapter {
    name: String,
    sequence: Vec<u8>,
    target: AdapterTarget,
}

/// Clips adapter read-through by aligning each adapter against every
/// offset of the read ("simple" clipping).
///
/// A match scores log10(4) and a mismatch costs a tenth of the read base's
/// quality. The read is cut at the leftmost offset whose alignment reaches
/// the simple clip threshold, provided the seed (first 16 aligned bases)
/// has no more than the allowed number of mismatches.
#[derive(Debug, Clone)]
pub struct IlluminaClipTrimmer {
    adapters: Vec<Adapter>,
    seed_mismatches: usize,
    palindrome_threshold: u32,
    simple_threshold: f32,
}

impl IlluminaClipTrimmer {
    pub fn from_fasta(
        path: &Path,
        seed_mismatches: usize,
        palindrome_threshold: u32,
        simple_threshold: u32,
    ) -> Result<Self> {
        let reader = fasta::Reader::from_file(path)
            .with_context(|| format!("Failed to open adapter file {}", path.display()))?;

        let mut adapters = Vec::new();
        for record in reader.records() {
            let record = record
                .with_context(|| format!("Failed to parse adapter file {}", path.display()))?;
            adapters.push(Adapter::new(record.id(), record.seq()));
        }
        if adapters.is_empty() {
            return Err(TrimError::invalid_trimmer(
                format!("ILLUMINACLIP:{}", path.display()),
                "adapter file contains no sequences",
            )
            .into());
        }
        for adapter in &adapters {
            log::debug!(
                "Adapter {} ({} bp, {:?}) from {}",
                adapter.name,
                adapter.sequence.len(),
                adapter.target,
                path.display()
            );
        }

        Ok(Self::new(adapters, seed_mismatches, palindrome_threshold, simple_threshold))
    }

    fn new(
        adapters: Vec<Adapter>,
        seed_mismatches: usize,
        palindrome_threshold: u32,
        simple_threshold: u32,
    ) -> Self {
        Self {
            adapters,
            seed_mismatches,
            palindrome_threshold,
            simple_threshold: simple_threshold as f32,
        }
    }

    pub fn palindrome_threshold(&self) -> u32 {
        self.palindrome_threshold
    }

    fn clip(&self, record: FastqRecord, mate: AdapterTarget) -> Option<FastqRecord> {
        let cut = self
            .adapters
            .iter()
            .filter(|adapter| adapter.target == AdapterTarget::Both || adapter.target == mate)
            .filter_map(|adapter| self.find_adapter(&record, &adapter.sequence))
            .min();

        match cut {
            None => Some(record),
            Some(0) => None,
            Some(keep) => Some(record.trim(0, keep)),
        }
    }

    fn find_adapter(&self, record: &FastqRecord, adapter: &[u8]) -> Option<usize> {
        (0..record.len()).find(|&offset| self.matches_at(record, adapter, offset))
    }

    fn matches_at(&self, record: &FastqRecord, adapter: &[u8], offset: usize) -> bool {
        let overlap = adapter.len().min(record.len() - offset);
        if (overlap as f32) * MATCH_SCORE < self.simple_threshold {
            return false;
        }

        let mut score = 0.0f32;
        let mut seed_mismatches = 0;
        for i in 0..overlap {
            let base = record.sequence[offset + i].to_ascii_uppercase();
            let expected = adapter[i].to_ascii_uppercase();

            if base == b'N' || expected == b'N' {
                continue;
            }
            if base == expected {
                score += MATCH_SCORE;
            } else {
                score -= record.quality_score(offset + i).max(0) as f32 / 10.0;
                if i < SEED_LENGTH {
                    seed_mismatches += 1;
                    if seed_mismatches > self.seed_mismatches {
                        return false;
                    }
                }
            }
        }
        score >= self.simple_threshold
    }
}

impl Adapter {
    fn new(name: &str, sequence: &[u8]) -> Self {
        let target = if name.ends_with("/1") {
            AdapterTarget::Mate1
        } else if name.ends_with("/2") {
            AdapterTarget::Mate2
        } else {
            AdapterTarget::Both
        };
        Self {
            name: name.to_string(),
            sequence: sequence.to_ascii_uppercase(),
            target,
        }
    }
}

impl Trimmer for IlluminaClipTrimmer {
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord> {
        self.clip(record, AdapterTarget::Both)
    }

    fn process_pair(&self, pair: MatePair) -> MatePair {
        MatePair {
            mate1: pair.mate1.and_then(|rec| self.clip(rec, AdapterTarget::Mate1)),
            mate2: pair.mate2.and_then(|rec| self.clip(rec, AdapterTarget::Mate2)),
        }
    }
}
