use super::batch::{pair_batches, Batch};
use crate::sequence_processor::core::MatePair;
use crate::sequence_processor::threading::PoolTask;
use crate::trimmers::TrimmerChain;
use std::sync::Arc;

/// One batch from each input, bound to the trimmer chain.
pub struct WorkItem {
    pub trimmers: Arc<TrimmerChain>,
    pub batches: (Batch, Batch),
    pub want_stats: bool,
    pub want_log: bool,
}

/// Trimmed mate pairs of one work item. `originals` holds the untrimmed
/// pairs at the same positions when statistics or the trim log need them,
/// and is empty otherwise.
#[derive(Debug, Default)]
pub struct ResultBatch {
    pub trimmed: Vec<MatePair>,
    pub originals: Vec<MatePair>,
    pub end_of_stream: bool,
}

impl WorkItem {
    pub fn new(trimmers: Arc<TrimmerChain>, batch1: Batch, batch2: Batch, want_stats: bool, want_log: bool) -> Self {
        Self {
            trimmers,
            batches: (batch1, batch2),
            want_stats,
            want_log,
        }
    }
}

impl PoolTask for WorkItem {
    type Output = ResultBatch;

    fn run(self) -> ResultBatch {
        let (batch1, batch2) = self.batches;
        let end_of_stream = batch1.is_end_of_stream() && batch2.is_end_of_stream();
        let pairs = pair_batches(batch1, batch2);

        let originals = if self.want_stats || self.want_log {
            pairs.clone()
        } else {
            Vec::new()
        };
        let trimmed = pairs
            .into_iter()
            .map(|pair| self.trimmers.apply(pair))
            .collect();

        ResultBatch {
            trimmed,
            originals,
            end_of_stream,
        }
    }
}
