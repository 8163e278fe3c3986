use super::work::ResultBatch;
use crate::error::TrimError;
use crate::sequence_processor::core::{FastqRecord, MatePair, PairFate, RecordSink, TrimStats};
use crate::sequence_processor::deferred::Deferred;
use crate::sequence_processor::writers::TrimLogWriter;
use anyhow::Result;
use crossbeam_channel::Receiver;
use indicatif::ProgressBar;
use std::fmt;
use std::thread;

/// The four record outputs of a paired-end run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Paired1,
    Unpaired1,
    Paired2,
    Unpaired2,
}

impl Destination {
    pub const ALL: [Destination; 4] = [
        Destination::Paired1,
        Destination::Unpaired1,
        Destination::Paired2,
        Destination::Unpaired2,
    ];

    /// The record this destination receives from a trimmed pair, if any.
    /// For any pair at most one paired pair of writes or one unpaired write
    /// happens, never both.
    pub fn select(self, pair: &MatePair) -> Option<&FastqRecord> {
        match (self, pair.fate()) {
            (Destination::Paired1, PairFate::BothKept) => pair.mate1.as_ref(),
            (Destination::Paired2, PairFate::BothKept) => pair.mate2.as_ref(),
            (Destination::Unpaired1, PairFate::OnlyMate1) => pair.mate1.as_ref(),
            (Destination::Unpaired2, PairFate::OnlyMate2) => pair.mate2.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Destination::Paired1 => "paired-1",
            Destination::Unpaired1 => "unpaired-1",
            Destination::Paired2 => "paired-2",
            Destination::Unpaired2 => "unpaired-2",
        };
        write!(f, "{}", name)
    }
}

/// A stage that acts on every result batch, in dispatch order.
pub trait Consumer: Send + 'static {
    type Output: Send + 'static;

    fn name(&self) -> String;
    fn consume(&mut self, batch: &ResultBatch) -> Result<()>;
    fn finish(self) -> Result<Self::Output>;
}

/// Writes the records belonging to one destination.
pub struct SinkRouter {
    destination: Destination,
    sink: Box<dyn RecordSink>,
}

impl SinkRouter {
    pub fn new(destination: Destination, sink: Box<dyn RecordSink>) -> Self {
        Self { destination, sink }
    }
}

impl Consumer for SinkRouter {
    type Output = ();

    fn name(&self) -> String {
        format!("sink-{}", self.destination)
    }

    fn consume(&mut self, batch: &ResultBatch) -> Result<()> {
        for pair in &batch.trimmed {
            if let Some(record) = self.destination.select(pair) {
                self.sink.write_record(record)?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.sink.close()
    }
}

/// Folds result batches into the run's statistics. Owns the accumulator
/// exclusively until it hands it back from `finish`.
pub struct StatsConsumer {
    stats: TrimStats,
    progress: ProgressBar,
}

impl StatsConsumer {
    pub fn new(progress: ProgressBar) -> Self {
        Self {
            stats: TrimStats::default(),
            progress,
        }
    }
}

impl Consumer for StatsConsumer {
    type Output = TrimStats;

    fn name(&self) -> String {
        "stats".to_string()
    }

    fn consume(&mut self, batch: &ResultBatch) -> Result<()> {
        for (original, trimmed) in batch.originals.iter().zip(&batch.trimmed) {
            self.stats.log_pair(original, trimmed);
        }
        self.progress.inc(batch.trimmed.len() as u64);
        Ok(())
    }

    fn finish(self) -> Result<TrimStats> {
        Ok(self.stats)
    }
}

/// Writes the per-read trim log.
pub struct TrimLogConsumer {
    log: TrimLogWriter,
}

impl TrimLogConsumer {
    pub fn new(log: TrimLogWriter) -> Self {
        Self { log }
    }
}

impl Consumer for TrimLogConsumer {
    type Output = ();

    fn name(&self) -> String {
        "trimlog".to_string()
    }

    fn consume(&mut self, batch: &ResultBatch) -> Result<()> {
        for (original, trimmed) in batch.originals.iter().zip(&batch.trimmed) {
            self.log.log_pair(original, trimmed)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.log.close()
    }
}

/// Wait on each handle in queue order and feed the resolved batch to the
/// consumer, stopping after the end-of-stream batch.
pub fn drain<C: Consumer>(mut consumer: C, rx: Receiver<Deferred<ResultBatch>>) -> Result<C::Output> {
    loop {
        let handle = rx.recv().map_err(|_| {
            TrimError::aborted(format!("{} queue closed before the end of input", consumer.name()))
        })?;
        let batch = handle.wait()?;
        consumer.consume(batch)?;
        if batch.end_of_stream {
            break;
        }
    }
    consumer.finish()
}

pub fn spawn<C: Consumer>(
    consumer: C,
    rx: Receiver<Deferred<ResultBatch>>,
) -> Result<(String, thread::JoinHandle<Result<C::Output>>)> {
    let name = consumer.name();
    let handle = thread::Builder::new().name(name.clone()).spawn(move || {
        let name = consumer.name();
        let result = drain(consumer, rx);
        match &result {
            Ok(_) => log::debug!("{} consumer finished", name),
            Err(e) => log::debug!("{} consumer stopped: {:#}", name, e),
        }
        result
    })?;
    Ok((name, handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_processor::deferred::deferred;
    use crossbeam_channel::bounded;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemorySink {
        names: Arc<Mutex<Vec<String>>>,
        closed: Arc<Mutex<bool>>,
    }

    impl RecordSink for MemorySink {
        fn write_record(&mut self, record: &FastqRecord) -> Result<()> {
            self.names.lock().unwrap().push(record.name());
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    fn rec(name: &str) -> Option<FastqRecord> {
        Some(FastqRecord::new(name, None, b"ACGT".to_vec(), b"IIII".to_vec(), 33))
    }

    fn result(pairs: Vec<MatePair>, end_of_stream: bool) -> ResultBatch {
        ResultBatch {
            originals: pairs.clone(),
            trimmed: pairs,
            end_of_stream,
        }
    }

    #[test]
    fn test_routing_is_exclusive() {
        let pairs = [
            MatePair::new(rec("a1"), rec("a2")),
            MatePair::new(rec("b1"), None),
            MatePair::new(None, rec("c2")),
            MatePair::new(None, None),
        ];

        for pair in &pairs {
            let hits: Vec<Destination> = Destination::ALL
                .into_iter()
                .filter(|d| d.select(pair).is_some())
                .collect();
            match pair.fate() {
                PairFate::BothKept => assert_eq!(hits, vec![Destination::Paired1, Destination::Paired2]),
                PairFate::OnlyMate1 => assert_eq!(hits, vec![Destination::Unpaired1]),
                PairFate::OnlyMate2 => assert_eq!(hits, vec![Destination::Unpaired2]),
                PairFate::Dropped => assert!(hits.is_empty()),
            }
        }
    }

    #[test]
    fn test_drain_follows_queue_order_not_completion_order() {
        let sink = MemorySink::default();
        let (tx, rx) = bounded(4);

        let (p1, d1) = deferred();
        let (p2, d2) = deferred();
        tx.send(d1).unwrap();
        tx.send(d2).unwrap();
        drop(tx);

        let consumer = SinkRouter::new(Destination::Paired1, Box::new(sink.clone()));
        let worker = thread::spawn(move || drain(consumer, rx));

        p2.resolve(result(vec![MatePair::new(rec("second"), rec("x"))], true));
        p1.resolve(result(vec![MatePair::new(rec("first"), rec("x"))], false));

        worker.join().unwrap().unwrap();
        assert_eq!(*sink.names.lock().unwrap(), vec!["first", "second"]);
        assert!(*sink.closed.lock().unwrap());
    }

    #[test]
    fn test_drain_without_sentinel_is_aborted() {
        let (tx, rx) = bounded(1);
        let (promise, handle) = deferred();
        promise.resolve(result(vec![MatePair::new(rec("a"), None)], false));
        tx.send(handle).unwrap();
        drop(tx);

        let err = drain(StatsConsumer::new(ProgressBar::hidden()), rx).unwrap_err();
        assert!(matches!(err.downcast_ref::<TrimError>(), Some(TrimError::Aborted(_))));
    }

    #[test]
    fn test_stats_consumer_counts_pairs() {
        let (tx, rx) = bounded(2);
        let (promise, handle) = deferred();
        promise.resolve(result(
            vec![
                MatePair::new(rec("a1"), rec("a2")),
                MatePair::new(rec("b1"), None),
                MatePair::new(None, None),
            ],
            true,
        ));
        tx.send(handle).unwrap();

        let stats = drain(StatsConsumer::new(ProgressBar::hidden()), rx).unwrap();
        assert_eq!(stats.input_pairs, 3);
        assert_eq!(stats.both_kept, 1);
        assert_eq!(stats.only_mate1_kept, 1);
        assert_eq!(stats.dropped, 1);
    }
}
