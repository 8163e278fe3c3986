use crate::error::TrimError;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::{Arc, OnceLock};

/// Write side of a single-assignment cell. Resolving consumes the promise;
/// dropping it unresolved wakes every reader with [`TrimError::Abandoned`].
pub struct Promise<T> {
    cell: Arc<OnceLock<T>>,
    _signal: Sender<()>,
}

/// Read side of a single-assignment cell. Any number of clones may wait on
/// it; all of them observe the same value, computed once.
pub struct Deferred<T> {
    cell: Arc<OnceLock<T>>,
    signal: Receiver<()>,
}

pub fn deferred<T>() -> (Promise<T>, Deferred<T>) {
    // nothing is ever sent: readers wake when the promise drops its sender
    let (tx, rx) = bounded(0);
    let cell = Arc::new(OnceLock::new());
    (
        Promise {
            cell: Arc::clone(&cell),
            _signal: tx,
        },
        Deferred { cell, signal: rx },
    )
}

impl<T> Promise<T> {
    pub fn resolve(self, value: T) {
        // the cell is only reachable from this promise, so it is still empty
        let _ = self.cell.set(value);
    }
}

impl<T> Deferred<T> {
    /// Block until the value is available.
    pub fn wait(&self) -> Result<&T, TrimError> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let _ = self.signal.recv();
        self.cell.get().ok_or(TrimError::Abandoned)
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            signal: self.signal.clone(),
        }
    }
}
