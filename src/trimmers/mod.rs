//! Trimming steps and the ordered chain they are applied in.
//!
//! Every step is a [`Trimmer`]: a pure function from a mate pair to a
//! narrower mate pair. Steps only ever shorten or drop reads, so once a
//! mate is gone no later step can bring it back.

mod avg_qual;
mod crop;
mod factory;
mod headcrop;
mod illumina_clip;
mod leading;
mod min_len;
mod sliding_window;
mod trailing;

pub use avg_qual::AvgQualTrimmer;
pub use crop::CropTrimmer;
pub use factory::parse_trimmer;
pub use headcrop::HeadCropTrimmer;
pub use illumina_clip::IlluminaClipTrimmer;
pub use leading::LeadingTrimmer;
pub use min_len::MinLenTrimmer;
pub use sliding_window::SlidingWindowTrimmer;
pub use trailing::TrailingTrimmer;

use crate::sequence_processor::core::{FastqRecord, MatePair};
use anyhow::Result;
use std::fmt;

pub trait Trimmer: Send + Sync + fmt::Debug {
    /// Trim a single read; `None` drops it.
    fn process_record(&self, record: FastqRecord) -> Option<FastqRecord>;

    /// Trim both mates independently. Steps that need to look at the pair
    /// as a whole override this.
    fn process_pair(&self, pair: MatePair) -> MatePair {
        MatePair {
            mate1: pair.mate1.and_then(|rec| self.process_record(rec)),
            mate2: pair.mate2.and_then(|rec| self.process_record(rec)),
        }
    }
}

/// Trimmers in the order they were configured.
#[derive(Debug, Default)]
pub struct TrimmerChain {
    steps: Vec<Box<dyn Trimmer>>,
}

impl TrimmerChain {
    pub fn new(steps: Vec<Box<dyn Trimmer>>) -> Self {
        Self { steps }
    }

    /// Build a chain from `NAME:arg:...` step descriptions.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let steps = specs
            .iter()
            .map(|spec| parse_trimmer(spec.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(steps))
    }

    pub fn apply(&self, pair: MatePair) -> MatePair {
        self.steps.iter().fold(pair, |pair, step| {
            if pair.is_empty() {
                pair
            } else {
                step.process_pair(pair)
            }
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::sequence_processor::core::FastqRecord;

    /// Phred+33 record whose quality string encodes `quals` directly.
    pub fn record_with_quals(name: &str, quals: &[u8]) -> FastqRecord {
        let sequence = (0..quals.len()).map(|i| b"ACGT"[i % 4]).collect();
        let quality = quals.iter().map(|q| q + 33).collect();
        FastqRecord::new(name, None, sequence, quality, 33)
    }
}
