pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sequence_processor;
pub mod trimmers;
pub mod utils;

// Re-export main API
pub use config::{Config, PipelineSettings};
pub use error::TrimError;
pub use pipeline::{PairedEndTrimmer, PairedOutputs};
pub use sequence_processor::{FastqRecord, MatePair, RecordSink, RecordSource, TrimStats};
pub use trimmers::{Trimmer, TrimmerChain};
