use super::deferred::{deferred, Deferred, Promise};
use crate::error::TrimError;
use anyhow::Result;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// CPU-bound unit of work executed on the pool. Tasks must not block on
/// I/O, so any worker can pick up any task.
pub trait PoolTask: Send + 'static {
    type Output: Send + Sync + 'static;

    fn run(self) -> Self::Output;
}

/// Fixed-size worker pool fed by a bounded task queue. `submit` blocks
/// while the queue is full, which is the pipeline's admission control.
pub struct ThreadPool<T: PoolTask> {
    handles: Vec<thread::JoinHandle<()>>,
    tx: Sender<(T, Promise<T::Output>)>,
    done: Receiver<()>,
    num_threads: usize,
}

impl<T: PoolTask> ThreadPool<T> {
    pub fn new(num_threads: usize, queue_capacity: usize) -> Result<Self> {
        let (tx, rx) = bounded::<(T, Promise<T::Output>)>(queue_capacity.max(1));
        let (done_tx, done) = bounded::<()>(0);
        let mut handles = Vec::with_capacity(num_threads);

        for idx in 0..num_threads {
            let rx = rx.clone();
            let done_tx = done_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("trim-worker-{}", idx))
                .spawn(move || {
                    while let Ok((task, promise)) = rx.recv() {
                        promise.resolve(task.run());
                    }
                    drop(done_tx);
                })?;
            handles.push(handle);
        }

        log::debug!(
            "Started {} trim workers with a task queue of {}",
            num_threads,
            queue_capacity.max(1)
        );

        Ok(ThreadPool {
            handles,
            tx,
            done,
            num_threads,
        })
    }

    pub fn submit(&self, task: T) -> Result<Deferred<T::Output>> {
        let (promise, result) = deferred();
        self.tx
            .send((task, promise))
            .map_err(|_| TrimError::aborted("trim workers are no longer accepting work"))?;
        Ok(result)
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Stop accepting work and wait for every queued task to finish.
    /// Exceeding `timeout` is fatal.
    pub fn finish(self, timeout: Duration) -> Result<()> {
        drop(self.tx);

        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                return Err(TrimError::PoolShutdownTimeout(timeout).into())
            }
        }

        for (idx, handle) in self.handles.into_iter().enumerate() {
            handle
                .join()
                .map_err(|_| TrimError::ThreadPanicked(format!("trim-worker-{}", idx)))?;
        }
        log::debug!("All {} trim workers finished", self.num_threads);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Square(u64);

    impl PoolTask for Square {
        type Output = u64;

        fn run(self) -> u64 {
            self.0 * self.0
        }
    }

    struct Nap(Duration);

    impl PoolTask for Nap {
        type Output = ();

        fn run(self) {
            thread::sleep(self.0);
        }
    }

    struct Explode;

    impl PoolTask for Explode {
        type Output = ();

        fn run(self) {
            panic!("boom");
        }
    }

    #[test]
    fn test_results_match_submission_handles() {
        let pool = ThreadPool::new(4, 8).unwrap();
        let handles: Vec<_> = (0..100).map(|i| pool.submit(Square(i)).unwrap()).collect();

        for (i, handle) in handles.iter().enumerate() {
            assert_eq!(*handle.wait().unwrap(), (i * i) as u64);
        }
        pool.finish(Duration::from_secs(10)).unwrap();
    }

    #[test]
    fn test_finish_drains_queued_tasks() {
        let pool = ThreadPool::new(2, 2).unwrap();
        let handles: Vec<_> = (0..20).map(|i| pool.submit(Square(i)).unwrap()).collect();
        pool.finish(Duration::from_secs(10)).unwrap();

        assert!(handles.iter().all(|h| h.is_resolved()));
    }

    #[test]
    fn test_panicking_task_abandons_its_result() {
        let pool = ThreadPool::new(1, 1).unwrap();
        let handle = pool.submit(Explode).unwrap();

        assert!(matches!(handle.wait(), Err(TrimError::Abandoned)));
        let err = pool.finish(Duration::from_secs(10)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrimError>(),
            Some(TrimError::ThreadPanicked(_))
        ));
    }

    #[test]
    fn test_slow_shutdown_is_fatal() {
        let pool = ThreadPool::new(1, 1).unwrap();
        let handle = pool.submit(Nap(Duration::from_millis(500))).unwrap();

        let err = pool.finish(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrimError>(),
            Some(TrimError::PoolShutdownTimeout(t)) if *t == Duration::from_millis(10)
        ));
        // the task itself still completes
        assert!(handle.wait().is_ok());
    }
}
