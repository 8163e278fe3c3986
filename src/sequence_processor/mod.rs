pub mod core;
pub mod deferred;
pub mod readers;
pub mod threading;
pub mod writers;

// Re-export commonly used items
pub use core::{FastqRecord, MatePair, PairFate, RecordSink, RecordSource, TrimStats};
pub use deferred::{deferred, Deferred, Promise};
pub use threading::{PoolTask, ThreadPool};
