use super::consumers::Destination;
use super::PairedOutputs;
use crate::sequence_processor::core::{MatePair, RecordSource, TrimStats};
use crate::sequence_processor::writers::TrimLogWriter;
use crate::trimmers::TrimmerChain;
use anyhow::Result;
use indicatif::ProgressBar;

const PROGRESS_INTERVAL: u64 = 10_000;

/// Reference mode: one pair at a time on the calling thread, no batching.
/// Produces exactly what the concurrent pipeline produces.
pub(crate) fn run(
    trimmers: &TrimmerChain,
    sources: [Box<dyn RecordSource>; 2],
    mut outputs: PairedOutputs,
    mut trim_log: Option<TrimLogWriter>,
    progress: &ProgressBar,
) -> Result<TrimStats> {
    let [mut source1, mut source2] = sources;
    let mut exhausted = [false, false];
    let mut warned = false;
    let mut stats = TrimStats::default();

    loop {
        let mate1 = if exhausted[0] { None } else { source1.next_record()? };
        let mate2 = if exhausted[1] { None } else { source2.next_record()? };
        exhausted[0] |= mate1.is_none();
        exhausted[1] |= mate2.is_none();

        if exhausted[0] && exhausted[1] {
            break;
        }
        if exhausted[0] != exhausted[1] && !warned {
            log::warn!(
                "{} ended before {}; remaining reads are processed as unpaired",
                if exhausted[0] { source1.source_name() } else { source2.source_name() },
                if exhausted[0] { source2.source_name() } else { source1.source_name() },
            );
            warned = true;
        }

        let original = MatePair::new(mate1, mate2);
        let trimmed = trimmers.apply(original.clone());

        for destination in Destination::ALL {
            if let Some(record) = destination.select(&trimmed) {
                outputs.sink_mut(destination).write_record(record)?;
            }
        }
        if let Some(log) = trim_log.as_mut() {
            log.log_pair(&original, &trimmed)?;
        }
        stats.log_pair(&original, &trimmed);

        if stats.input_pairs % PROGRESS_INTERVAL == 0 {
            progress.set_position(stats.input_pairs);
        }
    }
    progress.set_position(stats.input_pairs);

    outputs.close()?;
    if let Some(log) = trim_log.as_mut() {
        log.close()?;
    }

    Ok(stats)
}
