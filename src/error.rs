use std::time::Duration;
use thiserror::Error;

/// Failures raised by the trimming pipeline and its collaborators.
///
/// Configuration problems are detected before any output is produced.
/// Everything else is fatal for the whole run: partial paired-end output
/// is never reported as success.
#[derive(Debug, Error)]
pub enum TrimError {
    #[error("Unknown trimmer '{0}'")]
    UnknownTrimmer(String),

    #[error("Invalid trimmer specification '{spec}': {reason}")]
    InvalidTrimmer { spec: String, reason: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Malformed FASTQ record {index} in {source_name}: {reason}")]
    MalformedRecord {
        source_name: String,
        index: u64,
        reason: String,
    },

    #[error("Trim worker pool did not terminate within {0:?}")]
    PoolShutdownTimeout(Duration),

    #[error("{0} thread panicked")]
    ThreadPanicked(String),

    #[error("Trim result was abandoned before it was computed")]
    Abandoned,

    #[error("Pipeline aborted: {0}")]
    Aborted(String),
}

impl TrimError {
    #[cold]
    pub fn invalid_trimmer<S: Into<String>, R: Into<String>>(spec: S, reason: R) -> Self {
        TrimError::InvalidTrimmer {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    #[cold]
    pub fn malformed_record<S: Into<String>, R: Into<String>>(
        source_name: S,
        index: u64,
        reason: R,
    ) -> Self {
        TrimError::MalformedRecord {
            source_name: source_name.into(),
            index,
            reason: reason.into(),
        }
    }

    #[cold]
    pub fn aborted<R: Into<String>>(reason: R) -> Self {
        TrimError::Aborted(reason.into())
    }
}
