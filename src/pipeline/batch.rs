use crate::sequence_processor::core::{FastqRecord, MatePair, RecordSource};
use anyhow::Result;

/// Consecutive records from one input. An empty batch marks the end of
/// that input and never travels together with real records.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub source: usize,
    pub records: Vec<FastqRecord>,
}

impl Batch {
    pub fn end_of_stream(source: usize) -> Self {
        Self {
            source,
            records: Vec::new(),
        }
    }

    /// Pull up to `size` records. Every batch except the last one of a
    /// stream is full, so batch `k` of either input starts at record
    /// `k * size` and batches from the two inputs pair up position by
    /// position.
    pub fn read(source: &mut dyn RecordSource, index: usize, size: usize) -> Result<Self> {
        let mut records = Vec::with_capacity(size);
        while records.len() < size {
            match source.next_record()? {
                Some(record) => records.push(record),
                None => break,
            }
        }
        Ok(Self {
            source: index,
            records,
        })
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Pair records by position; the shorter batch leaves its slot absent.
pub fn pair_batches(batch1: Batch, batch2: Batch) -> Vec<MatePair> {
    let len = batch1.len().max(batch2.len());
    let mut mates1 = batch1.records.into_iter();
    let mut mates2 = batch2.records.into_iter();

    (0..len)
        .map(|_| MatePair::new(mates1.next(), mates2.next()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_processor::readers::FastqReader;
    use std::io::Cursor;

    fn fastq(n: usize) -> String {
        (0..n).map(|i| format!("@r{}\nACGT\n+\nIIII\n", i)).collect()
    }

    fn source(n: usize) -> FastqReader {
        FastqReader::from_reader(Box::new(Cursor::new(fastq(n).into_bytes())), "mem", 33, 1024).unwrap()
    }

    #[test]
    fn test_batches_are_full_until_the_last() {
        let mut src = source(7);
        let sizes: Vec<usize> = (0..4)
            .map(|_| Batch::read(&mut src, 1, 3).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![3, 3, 1, 0]);
    }

    #[test]
    fn test_pair_batches_pads_shorter_side() {
        let mut a = source(3);
        let mut b = source(1);
        let pairs = pair_batches(Batch::read(&mut a, 1, 10).unwrap(), Batch::read(&mut b, 2, 10).unwrap());

        assert_eq!(pairs.len(), 3);
        assert!(pairs[0].mate1.is_some() && pairs[0].mate2.is_some());
        assert!(pairs[2].mate1.is_some() && pairs[2].mate2.is_none());
        assert!(pair_batches(Batch::end_of_stream(1), Batch::end_of_stream(2)).is_empty());
    }
}
