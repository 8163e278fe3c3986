use super::batch::Batch;
use crate::error::TrimError;
use crate::sequence_processor::core::RecordSource;
use anyhow::Result;
use crossbeam_channel::{bounded, Receiver};
use std::thread;

/// Reads one input on its own thread and hands over fixed-size batches
/// through a bounded queue. The worker blocks while the queue is full.
pub struct SourceWorker {
    index: usize,
    handle: thread::JoinHandle<()>,
    rx: Receiver<Result<Batch>>,
}

impl SourceWorker {
    /// Batches arrive in input order, ending with exactly one empty batch.
    /// A decode failure is delivered in place of the batch it occurred in
    /// and ends the stream.
    pub fn spawn(
        mut source: Box<dyn RecordSource>,
        index: usize,
        batch_size: usize,
        queue_capacity: usize,
    ) -> Result<Self> {
        let (tx, rx) = bounded(queue_capacity.max(1));

        let handle = thread::Builder::new()
            .name(format!("source-{}", index))
            .spawn(move || {
                log::debug!("Reading {} as input {}", source.source_name(), index);
                loop {
                    match Batch::read(source.as_mut(), index, batch_size) {
                        Ok(batch) => {
                            let finished = batch.is_end_of_stream();
                            if tx.send(Ok(batch)).is_err() || finished {
                                break;
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
                log::debug!("Input {} closed", index);
            })?;

        Ok(Self { index, handle, rx })
    }

    /// Block for the next batch.
    pub fn next_batch(&self) -> Result<Batch> {
        match self.rx.recv() {
            Ok(batch) => batch,
            Err(_) => Err(TrimError::aborted(format!(
                "input {} stopped before its end of stream",
                self.index
            ))
            .into()),
        }
    }

    /// Wait for the reader thread. Any batches still queued are discarded,
    /// which also unblocks a reader stuck on a full queue.
    pub fn join(self) -> Result<()> {
        drop(self.rx);
        self.handle
            .join()
            .map_err(|_| TrimError::ThreadPanicked(format!("source-{}", self.index)).into())
    }
}
