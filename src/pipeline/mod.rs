//! Paired-end execution pipeline.
//!
//! Two record sources are paired position by position, every pair runs
//! through the trimmer chain, and surviving records are routed to four
//! outputs. With more than one thread the trimming runs on a worker pool
//! while every consumer (sink routers, statistics, trim log) reads the same
//! ordered sequence of deferred results, so the output is identical to the
//! single-threaded run.

mod batch;
mod consumers;
mod orchestrator;
mod single;
mod source_worker;
mod work;

pub use batch::{pair_batches, Batch};
pub use consumers::{Consumer, Destination, SinkRouter, StatsConsumer, TrimLogConsumer};
pub use source_worker::SourceWorker;
pub use work::{ResultBatch, WorkItem};

use crate::config::PipelineSettings;
use crate::sequence_processor::core::{RecordSink, RecordSource, TrimStats};
use crate::sequence_processor::writers::TrimLogWriter;
use crate::trimmers::TrimmerChain;
use anyhow::Result;
use indicatif::ProgressBar;
use std::sync::Arc;

/// The four record destinations of a paired-end run.
pub struct PairedOutputs {
    pub paired1: Box<dyn RecordSink>,
    pub unpaired1: Box<dyn RecordSink>,
    pub paired2: Box<dyn RecordSink>,
    pub unpaired2: Box<dyn RecordSink>,
}

impl PairedOutputs {
    pub fn new(
        paired1: Box<dyn RecordSink>,
        unpaired1: Box<dyn RecordSink>,
        paired2: Box<dyn RecordSink>,
        unpaired2: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            paired1,
            unpaired1,
            paired2,
            unpaired2,
        }
    }

    pub(crate) fn sink_mut(&mut self, destination: Destination) -> &mut dyn RecordSink {
        match destination {
            Destination::Paired1 => self.paired1.as_mut(),
            Destination::Unpaired1 => self.unpaired1.as_mut(),
            Destination::Paired2 => self.paired2.as_mut(),
            Destination::Unpaired2 => self.unpaired2.as_mut(),
        }
    }

    pub(crate) fn close(&mut self) -> Result<()> {
        for destination in Destination::ALL {
            self.sink_mut(destination).close()?;
        }
        Ok(())
    }

    pub(crate) fn into_routers(self) -> [SinkRouter; 4] {
        [
            SinkRouter::new(Destination::Paired1, self.paired1),
            SinkRouter::new(Destination::Unpaired1, self.unpaired1),
            SinkRouter::new(Destination::Paired2, self.paired2),
            SinkRouter::new(Destination::Unpaired2, self.unpaired2),
        ]
    }
}

/// Runs a trimmer chain over a pair of record sources.
pub struct PairedEndTrimmer {
    trimmers: Arc<TrimmerChain>,
    settings: PipelineSettings,
    progress: ProgressBar,
}

impl PairedEndTrimmer {
    pub fn new(trimmers: TrimmerChain, settings: PipelineSettings) -> Self {
        Self {
            trimmers: Arc::new(trimmers),
            settings,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Process both inputs to completion. One thread selects the inline
    /// reference mode; anything more uses the concurrent pipeline with that
    /// many trimming workers.
    pub fn process(
        &self,
        input1: Box<dyn RecordSource>,
        input2: Box<dyn RecordSource>,
        outputs: PairedOutputs,
        trim_log: Option<TrimLogWriter>,
    ) -> Result<TrimStats> {
        if self.settings.threads > 1 {
            self.process_multi_threaded(input1, input2, outputs, trim_log)
        } else {
            self.process_single_threaded(input1, input2, outputs, trim_log)
        }
    }

    pub fn process_single_threaded(
        &self,
        input1: Box<dyn RecordSource>,
        input2: Box<dyn RecordSource>,
        outputs: PairedOutputs,
        trim_log: Option<TrimLogWriter>,
    ) -> Result<TrimStats> {
        log::debug!("Trimming on the calling thread");
        let stats = single::run(&self.trimmers, [input1, input2], outputs, trim_log, &self.progress)?;
        self.progress.finish_and_clear();
        Ok(stats)
    }

    pub fn process_multi_threaded(
        &self,
        input1: Box<dyn RecordSource>,
        input2: Box<dyn RecordSource>,
        outputs: PairedOutputs,
        trim_log: Option<TrimLogWriter>,
    ) -> Result<TrimStats> {
        log::debug!(
            "Trimming with {} workers, batches of {}",
            self.settings.threads,
            self.settings.batch_size
        );
        let stats = orchestrator::run(
            Arc::clone(&self.trimmers),
            [input1, input2],
            outputs,
            trim_log,
            &self.settings,
            self.progress.clone(),
        )?;
        self.progress.finish_and_clear();
        Ok(stats)
    }
}
