use super::batch::Batch;
use super::consumers::{self, StatsConsumer, TrimLogConsumer};
use super::source_worker::SourceWorker;
use super::work::{ResultBatch, WorkItem};
use super::PairedOutputs;
use crate::config::PipelineSettings;
use crate::error::TrimError;
use crate::sequence_processor::core::{RecordSource, TrimStats};
use crate::sequence_processor::deferred::Deferred;
use crate::sequence_processor::threading::ThreadPool;
use crate::sequence_processor::writers::TrimLogWriter;
use crate::trimmers::TrimmerChain;
use anyhow::Result;
use crossbeam_channel::{bounded, Sender};
use indicatif::ProgressBar;
use std::sync::Arc;
use std::thread::JoinHandle;

type ConsumerQueue = Sender<Deferred<ResultBatch>>;

/// Concurrent pipeline: two source workers, a trimming pool and one thread
/// per consumer, connected by bounded queues.
pub(crate) fn run(
    trimmers: Arc<TrimmerChain>,
    sources: [Box<dyn RecordSource>; 2],
    outputs: PairedOutputs,
    trim_log: Option<TrimLogWriter>,
    settings: &PipelineSettings,
    progress: ProgressBar,
) -> Result<TrimStats> {
    let want_log = trim_log.is_some();
    let capacity = settings.consumer_queue_capacity;
    let mut queues: Vec<ConsumerQueue> = Vec::with_capacity(6);

    let mut sink_threads = Vec::with_capacity(4);
    for router in outputs.into_routers() {
        let (tx, rx) = bounded(capacity);
        queues.push(tx);
        sink_threads.push(consumers::spawn(router, rx)?);
    }

    let (tx, rx) = bounded(capacity);
    queues.push(tx);
    let stats_thread = consumers::spawn(StatsConsumer::new(progress), rx)?;

    let log_thread = match trim_log {
        Some(log) => {
            let (tx, rx) = bounded(capacity);
            queues.push(tx);
            Some(consumers::spawn(TrimLogConsumer::new(log), rx)?)
        }
        None => None,
    };

    log::debug!(
        "Started {} consumers with queues of {}",
        queues.len(),
        capacity
    );

    let [source1, source2] = sources;
    let workers = [
        SourceWorker::spawn(source1, 1, settings.batch_size, settings.source_queue_capacity)?,
        SourceWorker::spawn(source2, 2, settings.batch_size, settings.source_queue_capacity)?,
    ];
    let pool = ThreadPool::<WorkItem>::new(settings.threads, settings.task_queue_capacity)?;

    let mut errors = Vec::new();
    if let Err(e) = dispatch(&trimmers, &workers, &pool, &queues, want_log) {
        log::error!("Dispatch stopped: {:#}", e);
        errors.push(e);
    }

    // consumers that have not seen the sentinel stop once their queue is drained
    drop(queues);

    for worker in workers {
        if let Err(e) = worker.join() {
            errors.push(e);
        }
    }
    if let Err(e) = pool.finish(settings.pool_shutdown_timeout) {
        // consumers may be waiting on results that will never arrive
        if let Some(TrimError::PoolShutdownTimeout(_)) = e.downcast_ref::<TrimError>() {
            return Err(e);
        }
        errors.push(e);
    }

    for (name, handle) in sink_threads {
        if let Err(e) = join_consumer(&name, handle) {
            errors.push(e);
        }
    }
    if let Some((name, handle)) = log_thread {
        if let Err(e) = join_consumer(&name, handle) {
            errors.push(e);
        }
    }
    let (name, handle) = stats_thread;
    let stats = join_consumer(&name, handle);

    match first_cause(errors) {
        Some(e) => Err(e),
        None => stats,
    }
}

/// Pair batch `k` of each input into one work item and publish its handle to
/// every consumer, in order, until both inputs are exhausted.
fn dispatch(
    trimmers: &Arc<TrimmerChain>,
    workers: &[SourceWorker; 2],
    pool: &ThreadPool<WorkItem>,
    queues: &[ConsumerQueue],
    want_log: bool,
) -> Result<()> {
    let mut exhausted = [false, false];
    let mut warned = false;
    let mut dispatched = 0u64;

    loop {
        let batch1 = next_batch(&workers[0], exhausted[0], 1)?;
        let batch2 = next_batch(&workers[1], exhausted[1], 2)?;
        exhausted[0] |= batch1.is_end_of_stream();
        exhausted[1] |= batch2.is_end_of_stream();

        if exhausted[0] != exhausted[1] && !warned {
            log::warn!(
                "Input {} ended before input {}; remaining reads are processed as unpaired",
                if exhausted[0] { 1 } else { 2 },
                if exhausted[0] { 2 } else { 1 },
            );
            warned = true;
        }

        let finished = exhausted[0] && exhausted[1];
        let item = WorkItem::new(Arc::clone(trimmers), batch1, batch2, true, want_log);
        let handle = pool.submit(item)?;

        for queue in queues {
            queue
                .send(handle.clone())
                .map_err(|_| TrimError::aborted("a consumer stopped before the end of input"))?;
        }
        dispatched += 1;

        if finished {
            break;
        }
    }

    log::debug!("Dispatched {} work items", dispatched);
    Ok(())
}

fn next_batch(worker: &SourceWorker, exhausted: bool, index: usize) -> Result<Batch> {
    if exhausted {
        Ok(Batch::end_of_stream(index))
    } else {
        worker.next_batch()
    }
}

fn join_consumer<T>(name: &str, handle: JoinHandle<Result<T>>) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow::Error::from(TrimError::ThreadPanicked(name.to_string())))?
}

/// The error that started a teardown. Stages that merely noticed the
/// teardown report `Aborted` or `Abandoned` and are only used as a fallback.
fn first_cause(errors: Vec<anyhow::Error>) -> Option<anyhow::Error> {
    let is_secondary = |e: &anyhow::Error| {
        matches!(
            e.downcast_ref::<TrimError>(),
            Some(TrimError::Aborted(_)) | Some(TrimError::Abandoned)
        )
    };
    match errors.iter().position(|e| !is_secondary(e)) {
        Some(idx) => errors.into_iter().nth(idx),
        None => errors.into_iter().next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_cause_prefers_root_error() {
        let errors = vec![
            anyhow::Error::from(TrimError::aborted("consumer gone")),
            anyhow::Error::from(TrimError::Abandoned),
            anyhow::anyhow!("disk full"),
            anyhow::Error::from(TrimError::aborted("later")),
        ];
        let cause = first_cause(errors).unwrap();
        assert_eq!(cause.to_string(), "disk full");
    }

    #[test]
    fn test_first_cause_falls_back_to_first() {
        let errors = vec![
            anyhow::Error::from(TrimError::aborted("first")),
            anyhow::Error::from(TrimError::Abandoned),
        ];
        let cause = first_cause(errors).unwrap();
        assert!(cause.to_string().contains("first"));
        assert!(first_cause(Vec::new()).is_none());
    }
}
